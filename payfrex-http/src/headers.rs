//! HTTP encoding of secured request envelopes.
//!
//! A [`SecuredEnvelope`](payfrex::SecuredEnvelope) travels as three headers
//! (`apiVersion`, `encryptionMode`, `iv`) and a form-urlencoded body with
//! `merchantId`, `encrypted` and `integrityCheck`.

use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use payfrex::security::{EnvelopeBody, EnvelopeHeaders};
use url::form_urlencoded;

use crate::constants::{API_VERSION_HEADER, ENCRYPTION_MODE_HEADER, FORM_CONTENT_TYPE, IV_HEADER};
use crate::error::HttpError;

/// Builds the request headers for an envelope, including the form content
/// type.
///
/// # Errors
///
/// Returns [`HttpError::InvalidHeader`] if a value contains characters not
/// allowed in a header.
pub fn envelope_headers(headers: &EnvelopeHeaders) -> Result<HeaderMap, HttpError> {
    let mut map = HeaderMap::with_capacity(4);
    map.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
    insert(&mut map, API_VERSION_HEADER, &headers.api_version.to_string())?;
    insert(&mut map, ENCRYPTION_MODE_HEADER, headers.encryption_mode)?;
    insert(&mut map, IV_HEADER, &headers.iv)?;
    Ok(map)
}

/// Serializes the envelope body as `application/x-www-form-urlencoded`.
#[must_use]
pub fn form_body(body: &EnvelopeBody) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(body.pairs())
        .finish()
}

fn insert(map: &mut HeaderMap, name: &'static str, value: &str) -> Result<(), HttpError> {
    // Header names are case-insensitive; `from_bytes` normalizes to lowercase.
    let header = HeaderName::from_bytes(name.as_bytes()).map_err(|e| HttpError::InvalidHeader {
        name,
        reason: e.to_string(),
    })?;
    let value = HeaderValue::from_str(value).map_err(|e| HttpError::InvalidHeader {
        name,
        reason: e.to_string(),
    })?;
    map.insert(header, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use payfrex::security::{FixedIv, secure_with};

    const KEY: &[u8] = b"0123456789abcdef";

    #[test]
    fn test_envelope_headers() {
        let envelope = secure_with("amount=10", KEY, &FixedIv([0; 16])).unwrap();
        let map = envelope_headers(&envelope.headers(5)).unwrap();

        assert_eq!(map.len(), 4);
        assert_eq!(map.get("apiVersion").unwrap(), "5");
        assert_eq!(map.get("encryptionmode").unwrap(), "CBC");
        assert_eq!(map.get(IV_HEADER).unwrap(), "AAAAAAAAAAAAAAAAAAAAAA==");
        assert_eq!(map.get(CONTENT_TYPE).unwrap(), FORM_CONTENT_TYPE);
    }

    #[test]
    fn test_envelope_headers_rejects_control_characters() {
        let headers = EnvelopeHeaders {
            api_version: 5,
            encryption_mode: "CBC",
            iv: "bad\nvalue".to_owned(),
        };
        assert!(matches!(
            envelope_headers(&headers),
            Err(HttpError::InvalidHeader { name: "iv", .. })
        ));
    }

    #[test]
    fn test_form_body_escapes_base64() {
        let body = EnvelopeBody {
            merchant_id: "111222".to_owned(),
            encrypted: "ab+/c=".to_owned(),
            integrity_check: "00ff".to_owned(),
        };
        assert_eq!(
            form_body(&body),
            "merchantId=111222&encrypted=ab%2B%2Fc%3D&integrityCheck=00ff"
        );
    }

    #[test]
    fn test_form_body_round_trips_envelope() {
        let envelope = secure_with("a=1&b=2", KEY, &FixedIv([9; 16])).unwrap();
        let body = envelope.body("111222");
        let encoded = form_body(&body);

        let decoded: Vec<(String, String)> = form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(decoded[0], ("merchantId".to_owned(), "111222".to_owned()));
        assert_eq!(decoded[1].1, envelope.encrypted().as_str());
        assert_eq!(decoded[2].1, envelope.integrity_check());
    }
}
