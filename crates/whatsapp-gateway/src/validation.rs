//! Request validation rules.
//!
//! Rules run before any side effect. Every rule of a request is checked and
//! all failures are reported together.

use crate::api::{FormText, MediaForm, SendTextRequest, Upload};
use crate::error::ApiError;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Maximum message length, in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Brazilian mobile number: optional `+55`/trunk prefix, two-digit area code,
/// then either eight digits or a nine-digit mobile number starting with 9.
/// Digits are ASCII only, the same set the address builder keeps.
static BR_MOBILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^((\+?55\ ?[1-9]{2}\ ?)|(\+?55\ ?\([1-9]{2}\)\ ?)|(0[1-9]{2}\ ?)|(\([1-9]{2}\)\ ?)|([1-9]{2}\ ?))(([0-9]{4}\-?[0-9]{4})|(9[1-9]{1}[0-9]{3}\-?[0-9]{4}))$",
    )
    .expect("Brazilian mobile pattern is valid")
});

pub const TEXT_NUMBER_MESSAGE: &str =
    "Por favor, forneça um número de telefone válido no formato brasileiro (com DDD).";
pub const EMPTY_MESSAGE_MESSAGE: &str = "A mensagem não pode estar vazia.";
pub const MESSAGE_TOO_LONG_MESSAGE: &str = "A mensagem deve ter no máximo 1000 caracteres.";
pub const MEDIA_NUMBER_MESSAGE: &str = "Número de telefone inválido.";
pub const CAPTION_NOT_TEXT_MESSAGE: &str = "A legenda deve ser um texto.";

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub msg: String,
    pub path: String,
    pub location: &'static str,
}

impl FieldError {
    pub fn field(path: &str, value: Option<&str>, msg: impl Into<String>) -> Self {
        Self {
            kind: "field",
            value: value.map(str::to_string),
            msg: msg.into(),
            path: path.to_string(),
            location: "body",
        }
    }

    /// Failure of the request body as a whole (unparseable JSON or multipart).
    pub fn body(msg: impl Into<String>) -> Self {
        Self::field("body", None, msg)
    }
}

/// One declarative rule: a field, a check over its text, and the failure message.
struct Rule {
    path: &'static str,
    check: fn(&str) -> bool,
    message: &'static str,
}

const TEXT_RULES: &[Rule] = &[
    Rule {
        path: "number",
        check: is_brazilian_mobile,
        message: TEXT_NUMBER_MESSAGE,
    },
    Rule {
        path: "message",
        check: is_not_empty,
        message: EMPTY_MESSAGE_MESSAGE,
    },
    Rule {
        path: "message",
        check: within_message_limit,
        message: MESSAGE_TOO_LONG_MESSAGE,
    },
];

const MEDIA_RULES: &[Rule] = &[Rule {
    path: "number",
    check: is_brazilian_mobile,
    message: MEDIA_NUMBER_MESSAGE,
}];

/// Whether `number` is a Brazilian mobile number, area code included.
pub fn is_brazilian_mobile(number: &str) -> bool {
    BR_MOBILE.is_match(number)
}

fn is_not_empty(value: &str) -> bool {
    !value.is_empty()
}

fn within_message_limit(value: &str) -> bool {
    value.chars().count() <= MAX_MESSAGE_CHARS
}

/// Run `rules`, reading each field through `lookup`. Missing fields are
/// checked as the empty string.
fn apply<'a>(rules: &[Rule], lookup: impl Fn(&str) -> Option<&'a str>) -> Vec<FieldError> {
    rules
        .iter()
        .filter_map(|rule| {
            let value = lookup(rule.path);
            if (rule.check)(value.unwrap_or_default()) {
                None
            } else {
                Some(FieldError::field(rule.path, value, rule.message))
            }
        })
        .collect()
}

/// A text send request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    pub number: String,
    pub message: String,
}

/// A media send request that passed validation.
#[derive(Debug, Clone)]
pub struct MediaMessage {
    pub number: String,
    pub caption: Option<String>,
    pub upload: Upload,
}

/// Validate a text send request.
pub fn validate_text(request: SendTextRequest) -> Result<TextMessage, ApiError> {
    let errors = apply(TEXT_RULES, |path| match path {
        "number" => request.number.as_deref(),
        "message" => request.message.as_deref(),
        _ => None,
    });

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok(TextMessage {
        number: request.number.unwrap_or_default(),
        message: request.message.unwrap_or_default(),
    })
}

/// Validate a media send form.
///
/// A missing attachment is reported on its own, whatever the other fields hold.
pub fn validate_media(form: MediaForm) -> Result<MediaMessage, ApiError> {
    let Some(upload) = form.media else {
        return Err(ApiError::MissingFile);
    };

    let mut errors = apply(MEDIA_RULES, |path| match path {
        "number" => form.number.as_deref(),
        _ => None,
    });

    let caption = match form.caption {
        None => None,
        Some(FormText::Text(caption)) => Some(caption),
        Some(FormText::NotText) => {
            errors.push(FieldError::field("caption", None, CAPTION_NOT_TEXT_MESSAGE));
            None
        }
    };

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok(MediaMessage {
        number: form.number.unwrap_or_default(),
        caption,
        upload,
    })
}
