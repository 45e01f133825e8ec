//! Handlers for the configuration endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};

use super::dto::{AppConfigResponse, FeatureFlags, StripeConfigResponse};
use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::state::AppState;
use crate::domain::SUPPORTED_CURRENCIES;

/// GET /api/config/stripe - publishable key for browser-side tokenization.
pub async fn get_stripe_config(State(state): State<AppState>) -> impl IntoResponse {
    if !state.stripe.has_publishable_key() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Stripe publishable key not configured")),
        )
            .into_response();
    }

    Json(StripeConfigResponse {
        publishable_key: state.stripe.publishable_key.clone(),
        environment: state.stripe.environment_label().to_string(),
    })
    .into_response()
}

/// GET /api/config/app - app metadata and feature flags.
pub async fn get_app_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(AppConfigResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        supported_currencies: SUPPORTED_CURRENCIES.iter().map(|c| c.to_string()).collect(),
        features: FeatureFlags {
            saved_payment_methods: true,
            webhooks: state.stripe.has_webhook_secret(),
        },
    })
}
