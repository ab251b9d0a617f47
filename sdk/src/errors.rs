//! Error types for the Kaginawa client

use thiserror::Error;

/// A caller-supplied value was rejected before any network call.
///
/// These are programming errors: the call site passed something it should
/// not have, and retrying the same call will fail the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} is empty")]
    Empty(&'static str),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("{0} is not set yet")]
    NotSet(&'static str),

    #[error("not an http or https endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Main error type for the Kaginawa client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid argument: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to connect kaginawa server: {endpoint}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} {body}")]
    Server { status: u16, body: String },

    #[error("failed to decode {resource} response: {body}")]
    Decode {
        resource: &'static str,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status carried by a server failure; `None` for transport, decode
    /// and local errors.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}
