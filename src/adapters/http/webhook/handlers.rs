//! Handlers for the webhook endpoints.
//!
//! Status mapping: 400 for a missing signature header, an empty body or a
//! malformed payload, 401 for any signature failure, 500 when a handler
//! reports a processing failure, 200 otherwise.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};

use super::dto::{WebhookAckResponse, WebhookStatusResponse};
use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::state::AppState;
use crate::domain::RECOGNIZED_EVENT_TYPES;

/// POST /api/webhooks/stripe - verify, decode and dispatch one event.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let Some(signature) = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
    else {
        return error(StatusCode::BAD_REQUEST, "Missing Stripe-Signature header");
    };

    if body.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Empty webhook payload");
    }

    let event = match state.dispatcher.verify(&body, signature) {
        Ok(event) => event,
        Err(err) if err.is_signature_failure() => {
            tracing::warn!(error = %err, "Webhook signature rejected");
            return error(StatusCode::UNAUTHORIZED, "Invalid webhook signature");
        }
        Err(err) => {
            return error(StatusCode::BAD_REQUEST, err.to_string());
        }
    };

    let result = state.dispatcher.dispatch(&event).await;

    if !result.success {
        return error(StatusCode::INTERNAL_SERVER_ERROR, result.message);
    }

    Json(WebhookAckResponse {
        message: result.message,
        event_id: event.id,
    })
    .into_response()
}

/// GET /api/webhooks/stripe/status - diagnostic configuration view.
pub async fn webhook_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(WebhookStatusResponse {
        configured: state.dispatcher.secret_configured(),
        supported_events: RECOGNIZED_EVENT_TYPES
            .iter()
            .map(|t| t.to_string())
            .collect(),
    })
}

fn error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
