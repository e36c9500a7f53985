//! Services Layer
//!
//! Business logic that is not tied to a single HTTP handler.

pub mod mailer;

pub use mailer::{MailError, Mailer};
