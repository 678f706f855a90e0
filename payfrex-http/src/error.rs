//! Error types for the HTTP transport layer.

use http::StatusCode;
use payfrex::error::{ConfigError, CryptoError, NotificationError, ValidationError};
use payfrex::PayfrexError;

/// Errors that can occur while talking to the gateway.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// A header name or value could not be built from envelope material.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
        /// Why the header was rejected.
        reason: String,
    },

    /// URL parse error.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// HTTP transport error.
    #[cfg(feature = "client")]
    #[error("HTTP error: {context}: {source}")]
    Transport {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// Unexpected HTTP status code.
    #[error("unexpected HTTP status {status}: {context}: {body}")]
    Status {
        /// Human-readable context.
        context: &'static str,
        /// The HTTP status code.
        status: StatusCode,
        /// The response body.
        body: String,
    },

    /// Core SDK error: validation, crypto, configuration or notification
    /// parsing.
    #[error("{0}")]
    Payfrex(#[from] PayfrexError),
}

impl From<ValidationError> for HttpError {
    fn from(value: ValidationError) -> Self {
        Self::Payfrex(value.into())
    }
}

impl From<CryptoError> for HttpError {
    fn from(value: CryptoError) -> Self {
        Self::Payfrex(value.into())
    }
}

impl From<NotificationError> for HttpError {
    fn from(value: NotificationError) -> Self {
        Self::Payfrex(value.into())
    }
}

impl From<ConfigError> for HttpError {
    fn from(value: ConfigError) -> Self {
        Self::Payfrex(value.into())
    }
}
