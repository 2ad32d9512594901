//! Webhook receiver for verifying incoming webhooks.

use crate::error::{WebhookError, WebhookResult};
use crate::event::WebhookEvent;
use crate::signature::{SignatureError, WebhookSigner};

/// Default tolerance for the signature timestamp, in seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Header names, primary (`svix-*`) and Standard Webhooks fallback.
const ID_HEADERS: [&str; 2] = ["svix-id", "webhook-id"];
const TIMESTAMP_HEADERS: [&str; 2] = ["svix-timestamp", "webhook-timestamp"];
const SIGNATURE_HEADERS: [&str; 2] = ["svix-signature", "webhook-signature"];

/// The three transport headers every signed delivery carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookHeaders {
    /// Message id.
    pub id: String,
    /// Unix timestamp (seconds) as sent.
    pub timestamp: String,
    /// Space-separated signature list.
    pub signature: String,
}

impl WebhookHeaders {
    /// Creates headers from explicit values.
    pub fn new(id: impl Into<String>, timestamp: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
            signature: signature.into(),
        }
    }

    /// Extracts the headers through a case-insensitive lookup function.
    ///
    /// Empty values count as missing.
    pub fn extract<'a, F>(lookup: F) -> WebhookResult<Self>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let find = |names: [&str; 2]| -> WebhookResult<String> {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .map(str::trim)
                .find(|value| !value.is_empty())
                .map(str::to_string)
                .ok_or_else(|| WebhookError::MissingHeader(names[0].to_string()))
        };

        Ok(Self {
            id: find(ID_HEADERS)?,
            timestamp: find(TIMESTAMP_HEADERS)?,
            signature: find(SIGNATURE_HEADERS)?,
        })
    }
}

/// Webhook receiver for verifying incoming webhooks.
#[derive(Debug, Clone)]
pub struct WebhookReceiver {
    signer: WebhookSigner,
    /// Tolerance for timestamp validation (in seconds).
    tolerance_secs: Option<i64>,
}

impl WebhookReceiver {
    /// Creates a receiver from the provider secret.
    pub fn new(secret: &str) -> WebhookResult<Self> {
        let signer = WebhookSigner::new(secret)
            .map_err(|e| WebhookError::ConfigError(format!("WEBHOOK_SECRET: {e}")))?;
        Ok(Self::from_signer(signer))
    }

    /// Creates a receiver around an existing signer.
    pub fn from_signer(signer: WebhookSigner) -> Self {
        Self {
            signer,
            tolerance_secs: Some(DEFAULT_TOLERANCE_SECS),
        }
    }

    /// Sets the timestamp tolerance.
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = Some(tolerance_secs);
        self
    }

    /// Disables the timestamp window check.
    pub fn without_tolerance(mut self) -> Self {
        self.tolerance_secs = None;
        self
    }

    /// Returns the configured tolerance.
    pub fn tolerance_secs(&self) -> Option<i64> {
        self.tolerance_secs
    }

    /// Returns the signer.
    pub fn signer(&self) -> &WebhookSigner {
        &self.signer
    }

    /// Verifies a webhook signature and parses the envelope.
    pub fn verify(&self, headers: &WebhookHeaders, payload: &[u8]) -> WebhookResult<WebhookEvent> {
        self.verify_signature(headers, payload)?;

        let event: WebhookEvent = serde_json::from_slice(payload)?;
        Ok(event)
    }

    /// Verifies only the signature without parsing.
    pub fn verify_signature(&self, headers: &WebhookHeaders, payload: &[u8]) -> WebhookResult<()> {
        self.signer
            .verify_headers(
                &headers.id,
                &headers.timestamp,
                &headers.signature,
                payload,
                self.tolerance_secs,
            )
            .map_err(|e| match e {
                SignatureError::Expired => WebhookError::ExpiredSignature,
                SignatureError::InvalidFormat | SignatureError::Invalid | SignatureError::InvalidSecret => {
                    WebhookError::InvalidSignature
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";

    fn signed(receiver: &WebhookReceiver, payload: &[u8]) -> WebhookHeaders {
        let now = chrono::Utc::now().timestamp();
        WebhookHeaders::new("msg_1", now.to_string(), receiver.signer().sign("msg_1", now, payload))
    }

    #[test]
    fn test_extract_headers() {
        let map: HashMap<&str, &str> = [
            ("svix-id", "msg_1"),
            ("svix-timestamp", "1714000000"),
            ("svix-signature", "v1,abc"),
        ]
        .into_iter()
        .collect();

        let headers = WebhookHeaders::extract(|name| map.get(name).copied()).unwrap();
        assert_eq!(headers, WebhookHeaders::new("msg_1", "1714000000", "v1,abc"));
    }

    #[test]
    fn test_extract_falls_back_to_standard_names() {
        let map: HashMap<&str, &str> = [
            ("webhook-id", "msg_1"),
            ("webhook-timestamp", "1714000000"),
            ("svix-signature", "v1,abc"),
        ]
        .into_iter()
        .collect();

        let headers = WebhookHeaders::extract(|name| map.get(name).copied()).unwrap();
        assert_eq!(headers.id, "msg_1");
    }

    #[test]
    fn test_extract_missing_or_empty() {
        let map: HashMap<&str, &str> = [("svix-id", "msg_1"), ("svix-timestamp", " ")]
            .into_iter()
            .collect();

        let err = WebhookHeaders::extract(|name| map.get(name).copied()).unwrap_err();
        assert!(matches!(err, WebhookError::MissingHeader(ref h) if h == "svix-timestamp"));
    }

    #[test]
    fn test_invalid_secret_is_config_error() {
        let err = WebhookReceiver::new("whsec_!!").unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_verify_parses_envelope() {
        let receiver = WebhookReceiver::new(SECRET).unwrap();
        let payload = br#"{"type":"user.deleted","object":"event","data":{"id":"user_1","deleted":true}}"#;

        let event = receiver.verify(&signed(&receiver, payload), payload).unwrap();
        assert_eq!(event.event_type, "user.deleted");
        assert_eq!(event.data["id"], "user_1");
    }

    #[test]
    fn test_verify_rejects_tampered_body() {
        let receiver = WebhookReceiver::new(SECRET).unwrap();
        let headers = signed(&receiver, br#"{"type":"user.created"}"#);

        let err = receiver.verify(&headers, br#"{"type":"user.deleted"}"#).unwrap_err();
        assert!(matches!(err, WebhookError::InvalidSignature));
    }

    #[test]
    fn test_verify_signed_garbage_is_invalid_payload() {
        let receiver = WebhookReceiver::new(SECRET).unwrap();
        let payload = b"not json";

        let err = receiver.verify(&signed(&receiver, payload), payload).unwrap_err();
        assert!(matches!(err, WebhookError::InvalidPayload(_)));
    }

    #[test]
    fn test_expired_timestamp() {
        let receiver = WebhookReceiver::new(SECRET).unwrap().with_tolerance(60);
        let payload = b"{}";
        let old = chrono::Utc::now().timestamp() - 120;
        let headers = WebhookHeaders::new("msg_1", old.to_string(), receiver.signer().sign("msg_1", old, payload));

        assert!(matches!(
            receiver.verify_signature(&headers, payload),
            Err(WebhookError::ExpiredSignature)
        ));
        assert!(receiver.without_tolerance().verify_signature(&headers, payload).is_ok());
    }
}
