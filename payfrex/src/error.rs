//! Error types for the Payfrex SDK core.
//!
//! Each pipeline stage owns its error enum. [`PayfrexError`] aggregates them
//! for callers that drive the whole request/notification cycle.

/// Base error type for Payfrex SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum PayfrexError {
    /// Request parameters failed validation before encoding.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Payload encryption or decryption failed.
    #[error("{0}")]
    Crypto(#[from] CryptoError),

    /// A gateway notification could not be normalized.
    #[error("{0}")]
    Notification(#[from] NotificationError),

    /// SDK configuration is missing or invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by the payload securer.
///
/// These are caller-contract violations: a merchant key that is not a valid
/// AES key length, or a ciphertext that was not produced by this SDK.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CryptoError {
    /// The key is not 16, 24 or 32 bytes long.
    #[error("invalid AES key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    /// The initialization vector is not 16 bytes long.
    #[error("invalid initialization vector length: {0} bytes (expected 16)")]
    InvalidIvLength(usize),

    /// Ciphertext could not be decrypted or unpadded.
    #[error("decryption failed: {0}")]
    Decrypt(String),

    /// Decrypted bytes are not valid UTF-8.
    #[error("decrypted payload is not valid UTF-8")]
    Utf8,
}

/// Errors raised while normalizing a gateway notification.
///
/// Callers typically surface every variant as an "invalid response received"
/// condition.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum NotificationError {
    /// The notification document is empty or whitespace only.
    #[error("empty notification document")]
    Empty,

    /// The document is neither valid JSON nor valid XML of the expected shape.
    #[error("malformed notification: {0}")]
    Malformed(String),

    /// The document is XML but its root element is not a known dialect.
    #[error("unknown notification format: unexpected root element <{0}>")]
    UnknownFormat(String),
}

impl From<serde_json::Error> for NotificationError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}

impl From<quick_xml::DeError> for NotificationError {
    fn from(value: quick_xml::DeError) -> Self {
        Self::Malformed(value.to_string())
    }
}

impl From<quick_xml::Error> for NotificationError {
    fn from(value: quick_xml::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}

/// Errors raised by request parameter validators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A mandatory field is absent or null.
    #[error("missing mandatory field: {0}")]
    MissingField(&'static str),

    /// A field is present but its value is not acceptable.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Wire name of the offending field.
        field: &'static str,
        /// Human-readable description of the problem.
        reason: String,
    },
}

impl ValidationError {
    /// Creates an [`ValidationError::Invalid`] for `field`.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading [`Credentials`](crate::config::Credentials).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A mandatory environment variable is not set.
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    /// An environment variable is set but cannot be parsed.
    #[error("invalid value for environment variable {name}: {value}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The merchant key cannot be used as an AES key.
    #[error("{0}")]
    Key(#[from] CryptoError),
}
