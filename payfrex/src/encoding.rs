//! Base64 transport encoding for secured payloads.
//!
//! The gateway receives both the ciphertext and the initialization vector as
//! standard (padded) base64. [`Base64Bytes`] keeps the encoded ASCII form so
//! it can be written straight into a header or form body.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;
use std::fmt::Display;

/// Standard base64 text wrapping binary payload material.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Base64Bytes(String);

impl Base64Bytes {
    /// Encodes raw bytes.
    pub fn encode<T: AsRef<[u8]>>(input: T) -> Self {
        Self(b64.encode(input.as_ref()))
    }

    /// Wraps text that is already base64 encoded, e.g. a received `iv` header.
    ///
    /// The text is not checked until [`Base64Bytes::decode`] is called.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into().trim().to_owned())
    }

    /// Decodes back to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        b64.decode(&self.0)
    }

    /// Returns the encoded text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Base64Bytes {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Base64Bytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
