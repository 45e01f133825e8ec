//! Payment instruction and outcome shapes.

use serde::{Deserialize, Serialize};

use super::customer::CustomerRegistration;
use super::money::MinorUnits;

/// A caller's payment instruction, validated at the HTTP boundary.
///
/// At most one of `existing_customer_id` and `customer` is expected; when
/// both are present the explicit id wins and the inline info is ignored.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Amount to charge, in minor units.
    pub amount: MinorUnits,

    /// Lowercase ISO currency code.
    pub currency: String,

    /// Flag the intent to persist the method for deferred off-session use.
    pub save_payment_method: bool,

    /// Inline customer details for lookup-or-create.
    pub customer: Option<CustomerRegistration>,

    /// Gateway customer id supplied by the caller.
    pub existing_customer_id: Option<String>,
}

/// Outcome of a payment flow: everything the browser needs to confirm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Client confirmation secret for the gateway's browser library.
    pub client_secret: String,

    /// The customer the intent was scoped to, if any was resolved.
    pub customer_id: Option<String>,

    /// Gateway payment intent id (pi_...).
    pub payment_intent_id: String,
}

/// Simplified payment instruction: direct passthrough of intent options.
///
/// Unlike [`PaymentRequest`] this never creates a customer; the caller
/// supplies ids it already holds.
#[derive(Debug, Clone)]
pub struct SimpleChargeRequest {
    /// Amount to charge, in minor units.
    pub amount: MinorUnits,

    /// Lowercase ISO currency code.
    pub currency: String,

    /// Scope the intent to an existing customer.
    pub customer_id: Option<String>,

    /// Use a specific saved payment method; when absent the gateway picks
    /// eligible method types automatically.
    pub payment_method_id: Option<String>,

    /// Free-form description shown in the gateway dashboard.
    pub description: Option<String>,

    /// Flag the intent to persist the method for future use.
    pub save_payment_method: bool,
}

/// Outcome of requesting a setup intent: what the browser needs to tokenize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupIntentSecret {
    /// Client secret for the gateway's browser library.
    pub client_secret: String,

    /// Gateway setup intent id (seti_...).
    pub setup_intent_id: String,
}

/// Status snapshot of a payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentStatus {
    /// Gateway payment intent id.
    pub id: String,

    /// Provider-defined status string (e.g. "requires_action", "succeeded").
    pub status: String,

    /// Amount in minor units.
    pub amount: i64,

    /// Lowercase currency code.
    pub currency: String,
}
