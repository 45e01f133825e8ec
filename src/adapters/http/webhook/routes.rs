//! Router for the webhook endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{handle_stripe_webhook, webhook_status};
use crate::adapters::http::state::AppState;

/// Routes mounted under `/api/webhooks`.
pub fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/stripe", post(handle_stripe_webhook))
        .route("/stripe/status", get(webhook_status))
}
