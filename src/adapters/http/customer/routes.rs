//! Router for the customer endpoints.

use axum::routing::{delete, get, post};
use axum::Router;

use super::handlers::{
    create_customer, create_setup_intent, detach_payment_method, get_customer,
    get_customer_by_email, list_payment_methods, update_customer,
};
use crate::adapters::http::state::AppState;

/// Routes mounted under `/api/customers`.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_customer))
        .route("/by-email/:email", get(get_customer_by_email))
        .route("/payment-methods/:pm_id", delete(detach_payment_method))
        .route("/:id", get(get_customer).put(update_customer))
        .route("/:id/payment-methods", get(list_payment_methods))
        .route("/:id/setup-intent", post(create_setup_intent))
}
