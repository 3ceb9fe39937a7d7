//! Phone number to transport address conversion.

use whatsapp_client::USER_ADDRESS_SUFFIX;

/// Convert a raw, locale-formatted phone number into a WhatsApp user address.
///
/// Every character that is not an ASCII digit is dropped and the user address
/// suffix is appended. No length or country-code check happens here; an
/// address built from too few digits is still well formed and is only caught
/// by the registration check.
pub fn to_address(number: &str) -> String {
    let mut address: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    address.push_str(USER_ADDRESS_SUFFIX);
    address
}
