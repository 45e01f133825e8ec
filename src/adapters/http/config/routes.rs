//! Router for the configuration endpoints.

use axum::routing::get;
use axum::Router;

use super::handlers::{get_app_config, get_stripe_config};
use crate::adapters::http::state::AppState;

/// Routes mounted under `/api/config`.
pub fn config_routes() -> Router<AppState> {
    Router::new()
        .route("/stripe", get(get_stripe_config))
        .route("/app", get(get_app_config))
}
