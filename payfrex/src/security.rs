//! Payload encryption and integrity signing.
//!
//! The canonical query is encrypted with AES-CBC (PKCS#7 padding) under the
//! merchant key, and signed with a SHA-256 digest of the **plaintext**. The
//! key is the raw UTF-8 bytes of the merchant secret; no key derivation is
//! applied, so the secret must be exactly 16, 24 or 32 bytes long.
//!
//! ```
//! use payfrex::security::{FixedIv, decrypt, secure_with};
//!
//! let key = b"0123456789abcdef";
//! let envelope = secure_with("amount=50.0000&country=ES", key, &FixedIv([7; 16])).unwrap();
//! let plaintext = decrypt(envelope.ciphertext(), key, envelope.iv()).unwrap();
//! assert_eq!(plaintext, "amount=50.0000&country=ES");
//! ```

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::encoding::Base64Bytes;
use crate::error::CryptoError;

/// Value of the `encryptionMode` header.
pub const ENCRYPTION_MODE: &str = "CBC";

/// Initialization vector length in bytes.
pub const IV_LEN: usize = 16;

/// Produces initialization vectors for [`secure_with`].
///
/// Implementations must be safe to share between concurrent requests.
pub trait IvSource {
    /// Returns a fresh initialization vector.
    fn next_iv(&self) -> [u8; IV_LEN];
}

/// Draws every IV from the thread-local random generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIv;

impl IvSource for RandomIv {
    fn next_iv(&self) -> [u8; IV_LEN] {
        let mut iv = [0u8; IV_LEN];
        rand::thread_rng().fill_bytes(&mut iv);
        iv
    }
}

/// Always returns the same IV. Only for reproducing recorded fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIv(pub [u8; IV_LEN]);

impl IvSource for FixedIv {
    fn next_iv(&self) -> [u8; IV_LEN] {
        self.0
    }
}

/// Encrypted and signed request payload.
#[derive(Clone, PartialEq, Eq)]
pub struct SecuredEnvelope {
    ciphertext: Vec<u8>,
    iv: [u8; IV_LEN],
    signature: [u8; 32],
}

impl std::fmt::Debug for SecuredEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecuredEnvelope")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("iv", &self.iv_base64().as_str())
            .field("integrity_check", &self.integrity_check())
            .finish()
    }
}

impl SecuredEnvelope {
    /// Raw AES-CBC ciphertext.
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Raw initialization vector.
    #[must_use]
    pub const fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Raw SHA-256 digest of the plaintext.
    #[must_use]
    pub const fn signature(&self) -> &[u8; 32] {
        &self.signature
    }

    /// Always [`ENCRYPTION_MODE`].
    #[must_use]
    pub const fn encryption_mode(&self) -> &'static str {
        ENCRYPTION_MODE
    }

    /// Ciphertext as base64, the `encrypted` body field.
    #[must_use]
    pub fn encrypted(&self) -> Base64Bytes {
        Base64Bytes::encode(&self.ciphertext)
    }

    /// IV as base64, the `iv` header.
    #[must_use]
    pub fn iv_base64(&self) -> Base64Bytes {
        Base64Bytes::encode(self.iv)
    }

    /// Lowercase hex signature, the `integrityCheck` body field.
    #[must_use]
    pub fn integrity_check(&self) -> String {
        hex::encode(self.signature)
    }

    /// Header material for the outbound request.
    #[must_use]
    pub fn headers(&self, api_version: u32) -> EnvelopeHeaders {
        EnvelopeHeaders {
            api_version,
            encryption_mode: ENCRYPTION_MODE,
            iv: self.iv_base64().to_string(),
        }
    }

    /// Body material for the outbound request.
    #[must_use]
    pub fn body(&self, merchant_id: impl Into<String>) -> EnvelopeBody {
        EnvelopeBody {
            merchant_id: merchant_id.into(),
            encrypted: self.encrypted().to_string(),
            integrity_check: self.integrity_check(),
        }
    }
}

/// `apiVersion`, `encryptionMode` and `iv` header values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeHeaders {
    /// Caller-supplied API version.
    pub api_version: u32,
    /// Always `CBC`.
    pub encryption_mode: &'static str,
    /// Base64 initialization vector.
    pub iv: String,
}

/// `merchantId`, `encrypted` and `integrityCheck` body fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeBody {
    /// Merchant identifier.
    pub merchant_id: String,
    /// Base64 ciphertext.
    pub encrypted: String,
    /// Lowercase hex SHA-256 of the plaintext.
    pub integrity_check: String,
}

impl EnvelopeBody {
    /// Field name/value pairs in wire order.
    #[must_use]
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("merchantId", self.merchant_id.as_str()),
            ("encrypted", self.encrypted.as_str()),
            ("integrityCheck", self.integrity_check.as_str()),
        ]
    }
}

/// Encrypts and signs `plaintext` with a random IV.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeyLength`] if `key` is not 16, 24 or 32
/// bytes long.
pub fn secure(plaintext: &str, key: &[u8]) -> Result<SecuredEnvelope, CryptoError> {
    secure_with(plaintext, key, &RandomIv)
}

/// Encrypts and signs `plaintext` with an IV from `ivs`.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeyLength`] if `key` is not 16, 24 or 32
/// bytes long.
pub fn secure_with<S: IvSource + ?Sized>(
    plaintext: &str,
    key: &[u8],
    ivs: &S,
) -> Result<SecuredEnvelope, CryptoError> {
    let iv = ivs.next_iv();
    let ciphertext = encrypt_cbc(key, &iv, plaintext.as_bytes())?;

    #[cfg(feature = "telemetry")]
    tracing::debug!(
        key_bits = key.len() * 8,
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "Secured request payload"
    );

    Ok(SecuredEnvelope {
        ciphertext,
        iv,
        signature: signature(plaintext),
    })
}

/// Decrypts a payload produced by [`secure`].
///
/// # Errors
///
/// Returns [`CryptoError`] on a bad key or IV length, bad padding, or
/// non-UTF-8 plaintext.
pub fn decrypt(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<String, CryptoError> {
    if iv.len() != IV_LEN {
        return Err(CryptoError::InvalidIvLength(iv.len()));
    }
    let bytes = match key.len() {
        16 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        24 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        32 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        other => return Err(CryptoError::InvalidKeyLength(other)),
    }
    .map_err(|e| CryptoError::Decrypt(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| CryptoError::Utf8)
}

/// Lowercase hex SHA-256 of `plaintext`, as sent in `integrityCheck`.
#[must_use]
pub fn integrity_check(plaintext: &str) -> String {
    hex::encode(signature(plaintext))
}

/// Checks that `key` is usable as an AES key.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeyLength`] otherwise.
pub const fn validate_key(key: &[u8]) -> Result<(), CryptoError> {
    match key.len() {
        16 | 24 | 32 => Ok(()),
        other => Err(CryptoError::InvalidKeyLength(other)),
    }
}

fn signature(plaintext: &str) -> [u8; 32] {
    Sha256::digest(plaintext.as_bytes()).into()
}

fn encrypt_cbc(key: &[u8], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let invalid = |_| CryptoError::InvalidKeyLength(key.len());
    let ciphertext = match key.len() {
        16 => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        24 => cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        32 => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        other => return Err(CryptoError::InvalidKeyLength(other)),
    };
    Ok(ciphertext)
}
