//! HTTP adapters - REST API surface.
//!
//! Each route group has its own module with dto/handlers/routes; shared
//! state and error mapping live at this level.

pub mod config;
pub mod customer;
pub mod error;
pub mod payment;
pub mod state;
pub mod webhook;

use axum::Router;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

/// The complete API router, mounted at `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/config", config::config_routes())
        .nest("/customers", customer::customer_routes())
        .nest("/payments", payment::payment_routes())
        .nest("/webhooks", webhook::webhook_routes())
}
