//! Ports - boundaries to external collaborators.

mod gateway;
mod verifier;

pub use gateway::{
    BillingDetails, CardDetails, CreateIntentParams, GatewayCustomer, GatewayError,
    GatewayErrorKind, GatewayPaymentIntent, GatewayPaymentMethod, GatewaySetupIntent,
    PaymentGateway,
};
pub use verifier::{WebhookVerifier, WebhookVerifyError};
