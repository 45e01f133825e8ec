//! JSON shapes for the webhook endpoints.

use serde::Serialize;

/// Acknowledgement returned after successful dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub message: String,
    pub event_id: String,
}

/// Diagnostic view of the webhook configuration.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookStatusResponse {
    /// Whether a signing secret is configured.
    pub configured: bool,

    /// Event types this service dispatches explicitly.
    pub supported_events: Vec<String>,
}
