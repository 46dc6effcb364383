//! Mercado Pago webhook signature verification.
//!
//! HMAC-SHA256 over `{ts}.{body}` with constant-time comparison and a
//! replay window on the timestamp.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age for a webhook delivery (5 minutes).
const MAX_DELIVERY_AGE_SECS: i64 = 300;

/// Tolerated clock skew for timestamps from the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum WebhookVerifyError {
    #[error("invalid x-signature header: {0}")]
    ParseError(String),

    #[error("signature mismatch")]
    InvalidSignature,

    #[error("delivery too old")]
    TimestampOutOfRange,

    #[error("delivery timestamp in the future")]
    InvalidTimestamp,
}

/// Parsed `x-signature` header: `ts=<unix>,v1=<hex hmac>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub v1_signature: Vec<u8>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Result<Self, WebhookVerifyError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part.trim().split_once('=').ok_or_else(|| {
                WebhookVerifyError::ParseError("expected key=value pairs".to_string())
            })?;
            match key {
                "ts" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        WebhookVerifyError::ParseError("invalid ts".to_string())
                    })?);
                }
                "v1" => {
                    v1_signature = Some(hex::decode(value).map_err(|_| {
                        WebhookVerifyError::ParseError("invalid v1 hex".to_string())
                    })?);
                }
                // Unknown keys are ignored for forward compatibility.
                _ => {}
            }
        }

        Ok(SignatureHeader {
            timestamp: timestamp
                .ok_or_else(|| WebhookVerifyError::ParseError("missing ts".to_string()))?,
            v1_signature: v1_signature
                .ok_or_else(|| WebhookVerifyError::ParseError("missing v1".to_string()))?,
        })
    }
}

/// Verifier for Mercado Pago webhook deliveries.
pub struct WebhookVerifier {
    secret: SecretString,
}

impl WebhookVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verify the `x-signature` header against the raw request body.
    pub fn verify(&self, payload: &[u8], signature_header: &str) -> Result<(), WebhookVerifyError> {
        let header = SignatureHeader::parse(signature_header)?;
        self.validate_timestamp(header.timestamp)?;

        let expected = self.compute_signature(header.timestamp, payload);
        if !constant_time_compare(&expected, &header.v1_signature) {
            return Err(WebhookVerifyError::InvalidSignature);
        }
        Ok(())
    }

    fn validate_timestamp(&self, timestamp: i64) -> Result<(), WebhookVerifyError> {
        let age = chrono::Utc::now().timestamp() - timestamp;
        if age > MAX_DELIVERY_AGE_SECS {
            return Err(WebhookVerifyError::TimestampOutOfRange);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookVerifyError::InvalidTimestamp);
        }
        Ok(())
    }

    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let signed = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key size");
        mac.update(signed.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Builds a valid `x-signature` header value for test fixtures.
#[cfg(test)]
pub fn sign_for_tests(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let signed = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(signed.as_bytes());
    format!("ts={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "mp_webhook_secret_test";

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(SecretString::new(SECRET.to_string()))
    }

    #[test]
    fn parse_header_extracts_ts_and_v1() {
        let header = SignatureHeader::parse(&format!("ts=1234567890,v1={}", "a".repeat(64))).unwrap();
        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signature.len(), 32);
    }

    #[test]
    fn parse_header_ignores_unknown_keys() {
        let header =
            SignatureHeader::parse(&format!("ts=99,v1={},scheme=hmac", "b".repeat(64))).unwrap();
        assert_eq!(header.timestamp, 99);
    }

    #[test]
    fn parse_header_missing_parts_fails() {
        assert!(matches!(
            SignatureHeader::parse("ts=1234567890"),
            Err(WebhookVerifyError::ParseError(_))
        ));
        assert!(matches!(
            SignatureHeader::parse(&format!("v1={}", "a".repeat(64))),
            Err(WebhookVerifyError::ParseError(_))
        ));
        assert!(matches!(
            SignatureHeader::parse("ts=notanumber,v1=aa"),
            Err(WebhookVerifyError::ParseError(_))
        ));
    }

    #[test]
    fn valid_signature_verifies() {
        let payload = br#"{"type":"payment","data":{"id":"123"}}"#;
        let ts = chrono::Utc::now().timestamp();
        let header = sign_for_tests(SECRET, ts, payload);
        assert!(verifier().verify(payload, &header).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let payload = br#"{"type":"payment"}"#;
        let ts = chrono::Utc::now().timestamp();
        let header = sign_for_tests("other_secret", ts, payload);
        assert!(matches!(
            verifier().verify(payload, &header),
            Err(WebhookVerifyError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let ts = chrono::Utc::now().timestamp();
        let header = sign_for_tests(SECRET, ts, br#"{"data":{"id":"1"}}"#);
        assert!(matches!(
            verifier().verify(br#"{"data":{"id":"2"}}"#, &header),
            Err(WebhookVerifyError::InvalidSignature)
        ));
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let payload = b"{}";
        let ts = chrono::Utc::now().timestamp() - 600;
        let header = sign_for_tests(SECRET, ts, payload);
        assert!(matches!(
            verifier().verify(payload, &header),
            Err(WebhookVerifyError::TimestampOutOfRange)
        ));
    }

    #[test]
    fn future_timestamp_beyond_skew_is_rejected() {
        let payload = b"{}";
        let ts = chrono::Utc::now().timestamp() + 120;
        let header = sign_for_tests(SECRET, ts, payload);
        assert!(matches!(
            verifier().verify(payload, &header),
            Err(WebhookVerifyError::InvalidTimestamp)
        ));
    }

    #[test]
    fn small_future_skew_is_tolerated() {
        let payload = b"{}";
        let ts = chrono::Utc::now().timestamp() + 30;
        let header = sign_for_tests(SECRET, ts, payload);
        assert!(verifier().verify(payload, &header).is_ok());
    }
}
