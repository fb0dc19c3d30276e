//! Mail-send adapter for the SendGrid v3 REST API.
//!
//! Callers build a service-neutral [`Message`] and hand it to a
//! [`Client`], which maps it onto SendGrid's `mail/send` wire format,
//! posts it with Bearer auth, and folds the response back into a
//! `Result`. Success is exactly HTTP 202; anything else becomes an
//! [`Error`] carrying the status code and an aggregated description
//! built from the provider's error body.

pub mod email;
pub mod error;
pub mod sendgrid;

pub use email::{Address, AddressSpec, Addresses, Attachment, AttachmentContent, Message};
pub use error::Error;
pub use sendgrid::{Client, Config};
