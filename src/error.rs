use std::error;
use std::fmt;

/// All possible adapter errors.
/// Transport errors are converted, never retried or reinterpreted.
#[derive(Debug)]
pub enum Error {
    /// Malformed input, caught before any network call is made.
    Validation(String),
    /// Non-202 response from the provider. `message` is the aggregated
    /// description built from the provider's error body.
    Api { status: u16, message: String },
    UrlParse(String),
    RequestTimeout,
    Request(String),
    JsonParse(String),
}

impl Error {
    /// Provider status code, for callers that branch on it.
    /// `None` for anything that never reached a response.
    pub fn status(&self) -> Option<u16> {
        match *self {
            Error::Api { status, .. } => Some(status),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Validation(ref msg) => write!(f, "Validation: {}", msg),
            Error::Api { ref message, .. } => f.write_str(message),
            Error::UrlParse(ref msg) => write!(f, "UrlParse: {}", msg),
            Error::RequestTimeout => f.write_str("RequestTimeout"),
            Error::Request(ref msg) => write!(f, "Request: {}", msg),
            Error::JsonParse(ref msg) => write!(f, "JsonParse: {}", msg),
        }
    }
}

impl error::Error for Error {}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::UrlParse(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::RequestTimeout
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}
