//! Error types for the CRM client.
//!
//! # Design
//! Failures are split by where they happen: the request never completed
//! (`Transport`), the server answered with a rejected status (`Http`), the
//! status was fine but the envelope said `success: false` (`Envelope`), or
//! the payload could not be encoded/decoded. Nothing is retried here; the
//! caller decides what to do with each kind.

use thiserror::Error;

/// Boxed error produced by a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `CrmApi` parse methods and `RetailCrmClient` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be completed (connection refused, timeout, ...).
    #[error("transport failed: {0}")]
    Transport(#[source] BoxError),

    /// The server returned a status outside the accepted range.
    #[error("HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Http { status: u16, message: Option<String> },

    /// The status was accepted but the envelope reported `success: false`.
    #[error("[{status}] {body}")]
    Envelope { status: u16, body: String },

    /// A request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The client could not be configured.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status code attached to the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } | ApiError::Envelope { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub(crate) fn transport(err: impl Into<BoxError>) -> Self {
        ApiError::Transport(err.into())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ApiError>;
