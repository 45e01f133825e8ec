//! JSON shapes for the configuration endpoints.

use serde::Serialize;

/// Browser-safe Stripe configuration.
#[derive(Debug, Clone, Serialize)]
pub struct StripeConfigResponse {
    /// Publishable key (pk_...), safe to expose.
    pub publishable_key: String,

    /// "live" or "test", derived from the publishable key.
    pub environment: String,
}

/// Application-level configuration for the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfigResponse {
    pub name: String,
    pub version: String,
    pub supported_currencies: Vec<String>,
    pub features: FeatureFlags,
}

/// Which optional surfaces are active on this deployment.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureFlags {
    pub saved_payment_methods: bool,
    pub webhooks: bool,
}
