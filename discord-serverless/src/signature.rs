//! Discord interaction signature verification.
//!
//! Discord signs every interaction webhook with Ed25519.
//! Reference: https://discord.com/developers/docs/interactions/overview#setting-up-an-endpoint-validating-security-request-headers

use ed25519_dalek::{Signature, VerifyingKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use tracing::warn;

use crate::error::ConfigError;

/// Header carrying the hex-encoded Ed25519 signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Header carrying the timestamp that was signed along with the body.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Verify a Discord interaction signature.
///
/// Discord webhooks include two headers for signature verification:
/// - `X-Signature-Timestamp`: opaque timestamp string
/// - `X-Signature-Ed25519`: hex Ed25519 signature of timestamp + raw body
///
/// # Arguments
///
/// * `raw_body` - The request body exactly as received
/// * `timestamp` - The `X-Signature-Timestamp` header value
/// * `signature_hex` - The `X-Signature-Ed25519` header value
/// * `public_key_hex` - Your Discord application's public key
///
/// # Returns
///
/// `true` if the signature is valid, `false` for every failure mode.
pub fn verify_signature(
    raw_body: &[u8],
    timestamp: &str,
    signature_hex: &str,
    public_key_hex: &str,
) -> bool {
    match parse_public_key(public_key_hex) {
        Ok(key) => verify_with_key(&key, raw_body, timestamp, signature_hex),
        Err(e) => {
            warn!(error = %e, "interaction_signature_invalid_key");
            false
        }
    }
}

/// Verify a signature against an already-decoded public key.
pub fn verify_with_key(
    key: &VerifyingKey,
    raw_body: &[u8],
    timestamp: &str,
    signature_hex: &str,
) -> bool {
    if timestamp.is_empty() || signature_hex.is_empty() {
        warn!(
            has_timestamp = !timestamp.is_empty(),
            has_signature = !signature_hex.is_empty(),
            "interaction_signature_missing_fields"
        );
        return false;
    }

    let signature = match decode_signature(signature_hex) {
        Some(s) => s,
        None => {
            warn!(
                signature_length = signature_hex.len(),
                "interaction_signature_malformed"
            );
            return false;
        }
    };

    // Message = timestamp bytes followed by the untouched body bytes
    let mut message = Vec::with_capacity(timestamp.len() + raw_body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(raw_body);

    // verify_strict compares in constant time and rejects malleable signatures
    let valid = key.verify_strict(&message, &signature).is_ok();

    if !valid {
        warn!(body_length = raw_body.len(), "interaction_signature_mismatch");
    }

    valid
}

/// Decode a hex public key into an Ed25519 verifying key.
pub fn parse_public_key(public_key_hex: &str) -> Result<VerifyingKey, ConfigError> {
    let bytes = hex::decode(public_key_hex)
        .map_err(|e| ConfigError::InvalidHex(e.to_string()))?;

    let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| ConfigError::InvalidLength(bytes.len()))?;

    VerifyingKey::from_bytes(&bytes).map_err(|_| ConfigError::InvalidKey)
}

fn decode_signature(signature_hex: &str) -> Option<Signature> {
    let bytes = hex::decode(signature_hex).ok()?;
    let bytes: [u8; SIGNATURE_LENGTH] = bytes.as_slice().try_into().ok()?;
    Some(Signature::from_bytes(&bytes))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    pub(crate) fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    pub(crate) fn public_key_hex() -> String {
        hex::encode(signing_key().verifying_key().to_bytes())
    }

    pub(crate) fn sign(timestamp: &str, body: &[u8]) -> String {
        let mut message = timestamp.as_bytes().to_vec();
        message.extend_from_slice(body);
        hex::encode(signing_key().sign(&message).to_bytes())
    }

    const TIMESTAMP: &str = "1700000000";
    const BODY: &[u8] = br#"{"type":1,"id":"123"}"#;

    #[test]
    fn test_verify_signature_valid() {
        let signature = sign(TIMESTAMP, BODY);
        assert!(verify_signature(BODY, TIMESTAMP, &signature, &public_key_hex()));
    }

    #[test]
    fn test_verify_signature_tampered_body() {
        let signature = sign(TIMESTAMP, BODY);
        for i in 0..BODY.len() {
            let mut body = BODY.to_vec();
            body[i] ^= 0x01;
            assert!(!verify_signature(&body, TIMESTAMP, &signature, &public_key_hex()));
        }
    }

    #[test]
    fn test_verify_signature_tampered_timestamp() {
        let signature = sign(TIMESTAMP, BODY);
        assert!(!verify_signature(BODY, "1700000001", &signature, &public_key_hex()));
        assert!(!verify_signature(BODY, "", &signature, &public_key_hex()));
    }

    #[test]
    fn test_verify_signature_tampered_signature() {
        let signature = hex::decode(sign(TIMESTAMP, BODY)).unwrap();
        for i in 0..signature.len() {
            let mut forged = signature.clone();
            forged[i] ^= 0x80;
            assert!(!verify_signature(
                BODY,
                TIMESTAMP,
                &hex::encode(&forged),
                &public_key_hex()
            ));
        }
    }

    #[test]
    fn test_verify_signature_reserialized_body_rejected() {
        // Same JSON value, different bytes
        let signature = sign(TIMESTAMP, BODY);
        let reencoded = br#"{"id":"123","type":1}"#;
        assert!(!verify_signature(reencoded, TIMESTAMP, &signature, &public_key_hex()));
    }

    #[test]
    fn test_verify_signature_wrong_key() {
        let signature = sign(TIMESTAMP, BODY);
        let other = hex::encode(SigningKey::from_bytes(&[9u8; 32]).verifying_key().to_bytes());
        assert!(!verify_signature(BODY, TIMESTAMP, &signature, &other));
    }

    #[test]
    fn test_verify_signature_malformed_hex() {
        let signature = sign(TIMESTAMP, BODY);
        assert!(!verify_signature(BODY, TIMESTAMP, "not-hex", &public_key_hex()));
        assert!(!verify_signature(BODY, TIMESTAMP, &signature, "zz"));
        assert!(!verify_signature(BODY, TIMESTAMP, "", &public_key_hex()));
    }

    #[test]
    fn test_verify_signature_wrong_length() {
        let signature = sign(TIMESTAMP, BODY);
        assert!(!verify_signature(BODY, TIMESTAMP, &signature[..64], &public_key_hex()));
        assert!(!verify_signature(BODY, TIMESTAMP, &signature, &public_key_hex()[..62]));
        assert!(!verify_signature(
            BODY,
            TIMESTAMP,
            &format!("{}00", signature),
            &public_key_hex()
        ));
    }

    #[test]
    fn test_verify_signature_padded_key_rejected() {
        let signature = sign(TIMESTAMP, BODY);
        let padded = format!(" {}\n", public_key_hex());
        assert!(!verify_signature(BODY, TIMESTAMP, &signature, &padded));
        assert!(matches!(parse_public_key(&padded), Err(ConfigError::InvalidHex(_))));
    }

    #[test]
    fn test_parse_public_key_errors() {
        assert!(matches!(parse_public_key("xyz"), Err(ConfigError::InvalidHex(_))));
        assert!(matches!(parse_public_key("abcd"), Err(ConfigError::InvalidLength(2))));
        assert!(parse_public_key(&public_key_hex()).is_ok());
    }
}
