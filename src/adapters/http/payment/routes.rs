//! Router for the payment endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    charge_saved_method, confirm_intent, create_intent, create_simple_intent,
    detach_payment_method, get_intent, get_payment_method, list_saved_methods,
};
use crate::adapters::http::state::AppState;

/// Routes mounted under `/api/payments`.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/intent", post(create_intent))
        .route("/intent/saved-method", post(charge_saved_method))
        .route("/intent/simple", post(create_simple_intent))
        .route("/intent/:id/confirm", post(confirm_intent))
        .route("/intent/:id", get(get_intent))
        .route(
            "/methods/:id",
            get(get_payment_method).delete(detach_payment_method),
        )
        .route("/saved-methods/:customer_id", get(list_saved_methods))
}
