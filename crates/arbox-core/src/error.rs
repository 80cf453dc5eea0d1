//! Error types for the Arbox client.
//!
//! Transport failures, login failures and configuration problems each get
//! their own enum so callers can tell "the request broke" apart from "we
//! could not get a session". Public client operations return [`Error`],
//! which wraps all three.

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Failure of a single HTTP round-trip. Never retried by the transport.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid value for header {name}")]
    InvalidHeader { name: &'static str },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Gave up after {0} pages without reaching the end of the listing")]
    TooManyPages(u32),
}

impl TransportError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        TransportError::Status {
            status,
            body: Self::truncate_body(body),
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Network(e) => e.status(),
            _ => None,
        }
    }

    /// True when the server refused the credential (401 or 403).
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

/// Failure to obtain a fresh session token.
#[derive(Error, Debug)]
pub enum AuthenticationError {
    #[error("Can't login with your credentials: {0}")]
    Login(#[source] TransportError),

    #[error("Login response did not contain a session token")]
    MissingToken,

    /// A concurrent login attempt failed; carries that attempt's error message.
    #[error("Login attempt by another caller failed: {0}")]
    Concurrent(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("Environment variable {name} is not a valid number: {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Crate-level error returned by every public client operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
