//! SendGrid `mail/send` wire contract: request body types, the error
//! report returned on failure, and the mapping from the generic
//! [`Message`](crate::email::Message) onto the wire.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::email::{AddressSpec, Addresses, Message};
use crate::error::Error;
use crate::sendgrid::Config;

pub const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// One normalized address on the wire. `name` is set only when it
/// adds information beyond the bare email.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One recipient-set grouping. SendGrid accepts several per send; this
/// adapter always produces exactly one.
#[derive(Serialize, Debug)]
pub struct Personalization {
    pub to: Vec<EmailAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<Vec<EmailAddress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<Vec<EmailAddress>>,
}

#[derive(Serialize, Debug)]
pub struct Content {
    #[serde(rename = "type")]
    pub mime_type: &'static str,
    pub value: String,
}

#[derive(Serialize, Debug)]
pub struct Attachment {
    /// Base64-encoded file content.
    pub content: String,
    pub filename: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Reply addressing. SendGrid allows `reply_to` or `reply_to_list`
/// but never both; holding a single variant here and flattening it
/// into the request makes the exclusivity structural.
#[derive(Serialize, Debug, Clone)]
pub enum ReplyTo {
    #[serde(rename = "reply_to")]
    One(EmailAddress),
    #[serde(rename = "reply_to_list")]
    Many(Vec<EmailAddress>),
}

#[derive(Serialize, Debug)]
pub struct MailSendRequest {
    pub from: EmailAddress,
    pub personalizations: Vec<Personalization>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Content>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(flatten)]
    pub reply_to: Option<ReplyTo>,
}

impl MailSendRequest {
    /// Maps a generic message onto the wire format. Fails only on
    /// malformed attachments; every address shape is accepted.
    pub fn from_message(message: &Message, config: &Config) -> Result<Self, Error> {
        let cc = map_addresses(message.cc.as_ref());
        let bcc = map_addresses(message.bcc.as_ref());

        Ok(Self {
            from: map_from_address(message.from.as_ref(), config),
            personalizations: vec![Personalization {
                to: map_addresses(message.to.as_ref()),
                cc: if cc.is_empty() { None } else { Some(cc) },
                bcc: if bcc.is_empty() { None } else { Some(bcc) },
            }],
            subject: message.subject.clone().unwrap_or_default(),
            content: map_content(message),
            attachments: map_attachments(message.attachments.as_deref())?,
            reply_to: map_reply_to(message.reply_to.as_ref()),
        })
    }
}

/// Parses the `local-part@domain <Display Name>` convention: the text
/// before the first complete `<...>` pair is the email, the bracket
/// content is the display name. Without a complete pair the whole
/// (trimmed) string is the email and there is no name.
fn parse_address(s: &str) -> EmailAddress {
    if let Some(open) = s.find('<') {
        if let Some(close) = s[open + 1..].find('>') {
            return EmailAddress {
                email: s[..open].trim().to_string(),
                name: Some(s[open + 1..open + 1 + close].trim().to_string()),
            };
        }
    }

    EmailAddress {
        email: s.trim().to_string(),
        name: None,
    }
}

fn map_one(spec: &AddressSpec) -> EmailAddress {
    match *spec {
        AddressSpec::Text(ref s) => parse_address(s),
        AddressSpec::Parts(ref addr) => EmailAddress {
            email: addr.address.clone(),
            // A name identical to the address adds nothing.
            name: addr.name.clone().filter(|n| *n != addr.address),
        },
    }
}

fn map_addresses(input: Option<&Addresses>) -> Vec<EmailAddress> {
    match input {
        None => Vec::new(),
        // Empty strings count as absent, same as an empty list.
        Some(Addresses::One(AddressSpec::Text(s))) if s.is_empty() => Vec::new(),
        Some(Addresses::One(spec)) => vec![map_one(spec)],
        Some(Addresses::Many(list)) => list.iter().map(map_one).collect(),
    }
}

fn map_from_address(from: Option<&AddressSpec>, config: &Config) -> EmailAddress {
    match from {
        None => default_sender(config),
        Some(AddressSpec::Text(s)) if s.is_empty() => default_sender(config),
        Some(spec) => map_one(spec),
    }
}

fn default_sender(config: &Config) -> EmailAddress {
    EmailAddress {
        email: config.default_from_address.clone(),
        name: Some(config.default_from_name.clone()),
    }
}

fn map_content(message: &Message) -> Option<Vec<Content>> {
    if message.html.is_none() && message.text.is_none() {
        return None;
    }

    let mut parts = Vec::new();

    // HTML always precedes plain text, whichever was supplied.
    if let Some(ref html) = message.html {
        parts.push(Content {
            mime_type: "text/html",
            value: html.clone(),
        });
    }

    if let Some(ref text) = message.text {
        parts.push(Content {
            mime_type: "text/plain",
            value: text.clone(),
        });
    }

    Some(parts)
}

fn map_reply_to(input: Option<&Addresses>) -> Option<ReplyTo> {
    match input {
        None => None,
        Some(Addresses::One(AddressSpec::Text(s))) if s.is_empty() => None,
        Some(Addresses::One(spec)) => Some(ReplyTo::One(map_one(spec))),
        Some(Addresses::Many(list)) => {
            let mut addresses: Vec<EmailAddress> = list.iter().map(map_one).collect();

            // A one-element list collapses to the single form; the
            // list field is reserved for genuinely multiple addresses.
            match addresses.len() {
                0 => None,
                1 => Some(ReplyTo::One(addresses.remove(0))),
                _ => Some(ReplyTo::Many(addresses)),
            }
        }
    }
}

fn map_attachments(
    input: Option<&[crate::email::Attachment]>,
) -> Result<Option<Vec<Attachment>>, Error> {
    let list = match input {
        Some(list) => list,
        None => return Ok(None),
    };

    let mut out = Vec::with_capacity(list.len());

    for attachment in list {
        let filename = attachment.filename.as_ref();
        let content = attachment.content.as_ref();

        match (filename, content) {
            (Some(filename), Some(content)) => out.push(Attachment {
                content: BASE64.encode(content.as_bytes()),
                filename: filename.clone(),
                mime_type: None,
            }),
            _ => {
                return Err(Error::Validation(
                    "Attachment is missing filename or content".to_string(),
                ))
            }
        }
    }

    // An empty list is treated the same as no attachments at all.
    if out.is_empty() {
        Ok(None)
    } else {
        Ok(Some(out))
    }
}

/// Exactly 202 means the send was accepted and the body is to be
/// ignored; any other status is a failure, regardless of range.
pub fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::ACCEPTED
}

/// Decodes a failure response body into the surfaced error.
pub fn decode_failure(status: StatusCode, body: &[u8]) -> Error {
    let report: ErrorResponse = match serde_json::from_slice(body) {
        Ok(report) => report,
        Err(err) => return err.into(),
    };

    let status_text = status.canonical_reason().unwrap_or("");

    Error::Api {
        status: status.as_u16(),
        message: format_error(status.as_u16(), status_text, &report),
    }
}

/// Error body returned by SendGrid on any non-202 response.
#[derive(Deserialize, Debug, Default)]
pub struct ErrorResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ErrorDetail {
    pub message: Option<String>,
    pub field: Option<String>,
    /// Usually a docs URL, but the API does not guarantee a shape.
    pub help: Option<serde_json::Value>,
}

/// Builds the single aggregated message for a failed send.
///
/// Sub-errors missing either `message` or `field` contribute nothing.
/// Separators follow the position in the provider's list, so a skipped
/// first entry still leaves later fragments prefixed with `"; "`.
pub fn format_error(status: u16, status_text: &str, body: &ErrorResponse) -> String {
    let mut formatted = format!("Error sending email: {} {}", status, status_text);

    if let Some(ref id) = body.id {
        formatted.push_str(&format!(" (ID: {})", id));
    }

    formatted.push('.');

    for (idx, detail) in body.errors.iter().enumerate() {
        let (message, field) = match (detail.message.as_ref(), detail.field.as_ref()) {
            (Some(message), Some(field)) => (message, field),
            _ => continue,
        };

        formatted.push_str(if idx != 0 { "; " } else { " " });

        // The API reports a missing field as the literal string "null".
        if field != "null" {
            formatted.push_str(&format!("Field: {}, ", field));
        }

        formatted.push_str(&format!("Message: {}", message));

        if let Some(ref help) = detail.help {
            formatted.push_str(&format!(", Help: {} ", help_text(help)));
        }
    }

    formatted
}

fn help_text(help: &serde_json::Value) -> String {
    match *help {
        serde_json::Value::String(ref s) => s.clone(),
        ref other => other.to_string(),
    }
}
