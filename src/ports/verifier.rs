//! Webhook verifier port.
//!
//! Signature verification and envelope decoding are provider-specific, so
//! they live behind a port; the dispatcher stays provider-agnostic.

use thiserror::Error;

use crate::domain::WebhookEvent;

/// Verifies an inbound webhook's signature and decodes its envelope.
pub trait WebhookVerifier: Send + Sync {
    /// Whether a signing secret has been configured.
    fn is_configured(&self) -> bool;

    /// Check the signature and decode the payload into a typed event.
    fn verify_and_decode(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookEvent, WebhookVerifyError>;
}

/// Why an inbound webhook was rejected.
#[derive(Debug, Clone, Error)]
pub enum WebhookVerifyError {
    /// No signing secret configured; nothing can be verified.
    #[error("webhook signing secret not configured")]
    SecretNotConfigured,

    /// The signature header did not parse.
    #[error("malformed signature header: {0}")]
    MalformedHeader(String),

    /// Event timestamp outside the accepted replay window.
    #[error("event timestamp outside accepted window ({0} seconds old)")]
    TimestampOutOfRange(i64),

    /// The computed MAC did not match the provided signature.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The payload is not a valid event envelope.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl WebhookVerifyError {
    /// True when the failure is a signature problem rather than a payload
    /// problem. The HTTP layer maps these to 401 and the rest to 400.
    pub fn is_signature_failure(&self) -> bool {
        !matches!(self, Self::MalformedPayload(_))
    }
}
