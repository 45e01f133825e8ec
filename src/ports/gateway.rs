//! Payment gateway port.
//!
//! Defines the contract with the external payment platform. One client
//! instance is built at startup and injected into each orchestrator; there
//! is no ambient global state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{CustomerRegistration, ServiceError};

/// Port for the hosted payment platform.
///
/// Every operation is a single remote call; implementations do not retry.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a customer record.
    async fn create_customer(
        &self,
        registration: &CustomerRegistration,
    ) -> Result<GatewayCustomer, GatewayError>;

    /// Fetch a customer by id. `None` when absent or deleted.
    async fn get_customer(&self, customer_id: &str) -> Result<Option<GatewayCustomer>, GatewayError>;

    /// Overwrite a customer's name, email and phone.
    async fn update_customer(
        &self,
        customer_id: &str,
        registration: &CustomerRegistration,
    ) -> Result<GatewayCustomer, GatewayError>;

    /// Look up a customer by email. Provider-side equality match, at most
    /// one result (lookups are limited to one).
    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<GatewayCustomer>, GatewayError>;

    /// List card-type payment methods attached to a customer.
    async fn list_card_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<GatewayPaymentMethod>, GatewayError>;

    /// Fetch a payment method by id.
    async fn get_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<Option<GatewayPaymentMethod>, GatewayError>;

    /// Detach a payment method from its customer. Re-detaching surfaces the
    /// provider's own error, not a special case.
    async fn detach_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<GatewayPaymentMethod, GatewayError>;

    /// Create a card-scoped setup intent for off-session future usage.
    async fn create_setup_intent(
        &self,
        customer_id: &str,
    ) -> Result<GatewaySetupIntent, GatewayError>;

    /// Create a payment intent.
    async fn create_payment_intent(
        &self,
        params: CreateIntentParams,
    ) -> Result<GatewayPaymentIntent, GatewayError>;

    /// Confirm a payment intent (after a 3D Secure step).
    async fn confirm_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<GatewayPaymentIntent, GatewayError>;

    /// Fetch a payment intent by id.
    async fn get_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<GatewayPaymentIntent>, GatewayError>;
}

/// Customer record as the gateway reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayCustomer {
    /// Gateway customer id (cus_...).
    pub id: String,

    pub name: Option<String>,

    pub email: Option<String>,

    pub phone: Option<String>,

    /// Unix timestamp of creation.
    pub created: i64,
}

/// Payment method as the gateway reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPaymentMethod {
    /// Gateway payment method id (pm_...).
    pub id: String,

    /// Method type, e.g. "card".
    pub method_type: String,

    /// Customer this method is attached to, if any.
    pub customer: Option<String>,

    /// Unix timestamp of creation.
    pub created: i64,

    /// Card details, present for card-type methods.
    pub card: Option<CardDetails>,

    /// Billing contact details.
    pub billing: Option<BillingDetails>,
}

/// Card details on a payment method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDetails {
    pub brand: String,
    pub last4: String,
    pub exp_month: i64,
    pub exp_year: i64,
    pub funding: Option<String>,
    pub country: Option<String>,
    pub fingerprint: Option<String>,
}

/// Billing contact on a payment method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Payment intent as the gateway reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPaymentIntent {
    /// Gateway payment intent id (pi_...).
    pub id: String,

    /// Client confirmation secret. Absent on some status reads.
    pub client_secret: Option<String>,

    /// Provider-defined status.
    pub status: String,

    /// Amount in minor units.
    pub amount: i64,

    /// Lowercase currency code.
    pub currency: String,

    /// Customer the intent is scoped to, if any.
    pub customer: Option<String>,
}

/// Setup intent as the gateway reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySetupIntent {
    /// Gateway setup intent id (seti_...).
    pub id: String,

    /// Client secret for browser-side tokenization.
    pub client_secret: Option<String>,

    /// Provider-defined status.
    pub status: String,

    /// Customer the intent is scoped to.
    pub customer: Option<String>,
}

/// Parameters for creating a payment intent.
#[derive(Debug, Clone, Default)]
pub struct CreateIntentParams {
    /// Amount in minor units, already validated positive.
    pub amount: i64,

    /// Lowercase currency code.
    pub currency: String,

    /// Scope the intent to a customer.
    pub customer: Option<String>,

    /// Use a specific saved payment method.
    pub payment_method: Option<String>,

    /// Persist the method for deferred off-session use
    /// (`setup_future_usage=off_session`).
    pub save_for_future_use: bool,

    /// Confirm immediately on creation.
    pub confirm: bool,

    /// Use manual confirmation flow.
    pub manual_confirmation: bool,

    /// Return URL for redirect-based authentication steps.
    pub return_url: Option<String>,

    /// Let the gateway choose eligible method types instead of card-only.
    pub automatic_payment_methods: bool,

    /// Free-form description shown in the gateway dashboard.
    pub description: Option<String>,

    /// Metadata attached to the intent.
    pub metadata: HashMap<String, String>,
}

/// Error from a gateway operation.
#[derive(Debug, Clone)]
pub struct GatewayError {
    /// What went wrong.
    pub kind: GatewayErrorKind,

    /// Human-readable message, provider-supplied where available.
    pub message: String,

    /// Provider's error code (e.g. "resource_missing").
    pub provider_code: Option<String>,
}

/// Categories of gateway failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// Could not reach the platform.
    Network,

    /// The platform rejected or failed the call.
    Provider,

    /// The platform's response did not decode.
    Decode,
}

impl GatewayError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Network,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Provider,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Decode,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            GatewayErrorKind::Network => write!(f, "gateway unreachable: {}", self.message),
            GatewayErrorKind::Provider => write!(f, "{}", self.message),
            GatewayErrorKind::Decode => write!(f, "gateway response undecodable: {}", self.message),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<GatewayError> for ServiceError {
    fn from(err: GatewayError) -> Self {
        match err.kind {
            GatewayErrorKind::Provider => ServiceError::Gateway {
                message: err.message,
                provider_code: err.provider_code,
            },
            GatewayErrorKind::Network | GatewayErrorKind::Decode => {
                ServiceError::Unexpected(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn provider_error_maps_to_gateway_service_error() {
        let err = GatewayError::provider("No such customer: cus_x")
            .with_provider_code("resource_missing");
        let service: ServiceError = err.into();
        assert!(matches!(service, ServiceError::Gateway { .. }));
    }

    #[test]
    fn network_error_maps_to_unexpected() {
        let err = GatewayError::network("connection refused");
        let service: ServiceError = err.into();
        assert!(matches!(service, ServiceError::Unexpected(_)));
    }
}
