//! Customer shapes.
//!
//! The gateway is the system of record; these types live for a single
//! request/response cycle and are never cached or persisted.

use serde::{Deserialize, Serialize};

/// Caller-supplied customer details for creation and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRegistration {
    /// Full name.
    pub name: String,

    /// Email address, the lookup key for find-or-create.
    pub email: String,

    /// Phone number (optional).
    pub phone: Option<String>,
}

/// A tokenized card reference attached to a gateway customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPaymentMethod {
    /// Gateway payment method id (pm_...).
    pub id: String,

    /// Method type as reported by the gateway (always "card" here).
    pub method_type: String,

    /// Card network brand.
    pub brand: String,

    /// Last four digits of the card number.
    pub last4: String,

    /// Expiry month (1-12).
    pub exp_month: i64,

    /// Expiry year (four digits).
    pub exp_year: i64,
}

/// A gateway customer mirrored into a response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    /// Gateway customer id (cus_...).
    pub customer_id: String,

    /// Full name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Phone number, if set.
    pub phone: Option<String>,

    /// Card payment methods attached to the customer.
    pub saved_payment_methods: Vec<SavedPaymentMethod>,
}
