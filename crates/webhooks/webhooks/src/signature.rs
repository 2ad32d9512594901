//! Svix-style HMAC signature generation and verification.
//!
//! The signed content is `"{msg_id}.{timestamp}.{payload}"`, authenticated
//! with HMAC-SHA256 and base64 encoded. A signature header carries one or more
//! space-separated `v1,<base64>` entries.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Prefix on secrets issued by the provider dashboard.
pub const SECRET_PREFIX: &str = "whsec_";

/// Signature scheme version tag.
const VERSION_V1: &str = "v1";

/// Signature verification errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The secret is not valid base64.
    #[error("Invalid webhook secret")]
    InvalidSecret,
    /// Invalid signature or timestamp format.
    #[error("Invalid signature format")]
    InvalidFormat,
    /// Signature is invalid.
    #[error("Invalid signature")]
    Invalid,
    /// Timestamp is outside the tolerance window.
    #[error("Signature expired")]
    Expired,
}

/// Webhook signer for generating and verifying signatures.
#[derive(Clone)]
pub struct WebhookSigner {
    key: Vec<u8>,
}

impl std::fmt::Debug for WebhookSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSigner").finish_non_exhaustive()
    }
}

impl WebhookSigner {
    /// Creates a signer from a provider secret (`whsec_<base64>`).
    pub fn new(secret: &str) -> Result<Self, SignatureError> {
        let encoded = secret.trim();
        let encoded = encoded.strip_prefix(SECRET_PREFIX).unwrap_or(encoded);
        if encoded.is_empty() {
            return Err(SignatureError::InvalidSecret);
        }

        let key = STANDARD
            .decode(encoded)
            .map_err(|_| SignatureError::InvalidSecret)?;
        Ok(Self { key })
    }

    /// Creates a signer from raw key bytes.
    pub fn from_key(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Returns the secret in `whsec_` form.
    pub fn secret(&self) -> String {
        format!("{}{}", SECRET_PREFIX, STANDARD.encode(&self.key))
    }

    /// Generates a signature header value (`v1,<base64>`).
    pub fn sign(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> String {
        let signature = STANDARD.encode(self.compute(msg_id, timestamp, payload));
        format!("{},{}", VERSION_V1, signature)
    }

    /// Checks a signature header against the payload.
    ///
    /// Returns true if any `v1` entry matches. Unknown versions are skipped.
    pub fn verify(&self, msg_id: &str, timestamp: i64, payload: &[u8], header: &str) -> bool {
        let expected = self.compute(msg_id, timestamp, payload);

        header
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == VERSION_V1)
            .filter_map(|(_, signature)| STANDARD.decode(signature).ok())
            .any(|provided| constant_time_compare(&expected, &provided))
    }

    /// Verifies the full header triple, including the timestamp window.
    ///
    /// `tolerance_secs` of `None` disables the window check.
    pub fn verify_headers(
        &self,
        msg_id: &str,
        timestamp: &str,
        header: &str,
        payload: &[u8],
        tolerance_secs: Option<i64>,
    ) -> Result<(), SignatureError> {
        let timestamp = timestamp
            .trim()
            .parse::<i64>()
            .map_err(|_| SignatureError::InvalidFormat)?;

        if let Some(tolerance) = tolerance_secs {
            let now = chrono::Utc::now().timestamp();
            if now.abs_diff(timestamp) > tolerance.max(0).unsigned_abs() {
                return Err(SignatureError::Expired);
            }
        }

        if !header.contains(',') {
            return Err(SignatureError::InvalidFormat);
        }

        if !self.verify(msg_id, timestamp, payload, header) {
            return Err(SignatureError::Invalid);
        }

        Ok(())
    }

    fn compute(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");

        // Sign: id.timestamp.payload
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);

        mac.finalize().into_bytes().to_vec()
    }
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
