//! WhatsApp Gateway - HTTP API for sending WhatsApp messages.
//!
//! The gateway sits in front of an automated WhatsApp web session to:
//! - Validate send requests before touching the session
//! - Check that the recipient is on WhatsApp before delivering
//! - Send text messages and in-memory media uploads
//!
//! The HTTP surface is only served once the session reports it is ready.

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod phone;
pub mod send;
pub mod validation;

pub use config::Config;
pub use error::ApiError;
pub use lifecycle::{Lifecycle, LifecycleError, SessionState};
pub use send::{Confirmation, Messenger, PayloadKind, SendError};
