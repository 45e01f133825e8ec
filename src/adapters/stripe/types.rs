//! Stripe wire types.
//!
//! These mirror the subset of the Stripe API objects this service touches,
//! as they arrive in REST responses and webhook payloads. Conversions into
//! the port types live here so the client stays request plumbing only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ports::{
    BillingDetails, CardDetails, GatewayCustomer, GatewayPaymentIntent, GatewayPaymentMethod,
    GatewaySetupIntent,
};

/// Stripe Customer object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCustomer {
    /// Unique customer identifier (cus_...).
    pub id: String,

    pub email: Option<String>,

    pub name: Option<String>,

    pub phone: Option<String>,

    /// Unix timestamp of creation.
    #[serde(default)]
    pub created: i64,

    /// Custom metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Whether the customer has been deleted.
    #[serde(default)]
    pub deleted: bool,
}

impl From<StripeCustomer> for GatewayCustomer {
    fn from(c: StripeCustomer) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            created: c.created,
        }
    }
}

/// Stripe PaymentMethod object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentMethod {
    /// Unique payment method identifier (pm_...).
    pub id: String,

    /// Method type, e.g. "card".
    #[serde(rename = "type")]
    pub method_type: String,

    /// Customer the method is attached to, if any.
    pub customer: Option<String>,

    /// Unix timestamp of creation.
    #[serde(default)]
    pub created: i64,

    /// Card details, present for card-type methods.
    pub card: Option<StripeCard>,

    /// Billing contact details.
    pub billing_details: Option<StripeBillingDetails>,
}

/// Card details embedded in a payment method.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCard {
    pub brand: String,
    pub last4: String,
    pub exp_month: i64,
    pub exp_year: i64,
    pub funding: Option<String>,
    pub country: Option<String>,
    pub fingerprint: Option<String>,
}

/// Billing details embedded in a payment method.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeBillingDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<StripePaymentMethod> for GatewayPaymentMethod {
    fn from(pm: StripePaymentMethod) -> Self {
        Self {
            id: pm.id,
            method_type: pm.method_type,
            customer: pm.customer,
            created: pm.created,
            card: pm.card.map(|card| CardDetails {
                brand: card.brand,
                last4: card.last4,
                exp_month: card.exp_month,
                exp_year: card.exp_year,
                funding: card.funding,
                country: card.country,
                fingerprint: card.fingerprint,
            }),
            billing: pm.billing_details.map(|billing| BillingDetails {
                name: billing.name,
                email: billing.email,
                phone: billing.phone,
            }),
        }
    }
}

/// Stripe PaymentIntent object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentIntent {
    /// Unique payment intent identifier (pi_...).
    pub id: String,

    /// Client confirmation secret. Stripe omits it on some reads.
    pub client_secret: Option<String>,

    /// Intent status (requires_payment_method, succeeded, ...).
    pub status: String,

    /// Amount in minor units.
    pub amount: i64,

    /// Lowercase currency code.
    pub currency: String,

    pub customer: Option<String>,

    /// Last error message on a failed confirmation attempt.
    pub last_payment_error: Option<StripeIntentError>,

    /// Custom metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Error detail nested in a failed payment intent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeIntentError {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl From<StripePaymentIntent> for GatewayPaymentIntent {
    fn from(pi: StripePaymentIntent) -> Self {
        Self {
            id: pi.id,
            client_secret: pi.client_secret,
            status: pi.status,
            amount: pi.amount,
            currency: pi.currency,
            customer: pi.customer,
        }
    }
}

/// Stripe SetupIntent object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSetupIntent {
    /// Unique setup intent identifier (seti_...).
    pub id: String,

    /// Client secret for browser-side tokenization.
    pub client_secret: Option<String>,

    /// Intent status.
    pub status: String,

    pub customer: Option<String>,
}

impl From<StripeSetupIntent> for GatewaySetupIntent {
    fn from(si: StripeSetupIntent) -> Self {
        Self {
            id: si.id,
            client_secret: si.client_secret,
            status: si.status,
            customer: si.customer,
        }
    }
}

/// Stripe Invoice object, webhook payloads only.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeInvoice {
    /// Unique invoice identifier (in_...).
    pub id: String,

    pub customer: Option<String>,

    /// Invoice status (draft, open, paid, void, uncollectible).
    pub status: String,

    /// Amount paid in minor units.
    #[serde(default)]
    pub amount_paid: i64,

    /// Lowercase currency code.
    pub currency: String,
}

/// Paginated list container for GET endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    pub data: Vec<T>,

    #[serde(default)]
    pub has_more: bool,
}

/// Webhook event envelope as delivered by Stripe.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeWebhookEvent {
    /// Unique event identifier (evt_...).
    pub id: String,

    /// Event type tag (e.g. "payment_intent.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp when the event was created.
    pub created: i64,

    /// Event payload containing the affected object.
    pub data: StripeEventData,

    /// Whether this is a live or test event.
    #[serde(default)]
    pub livemode: bool,

    /// Stripe API version used for this event.
    pub api_version: Option<String>,
}

/// Event data container.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object affected by this event.
    pub object: serde_json::Value,

    /// Previous values for updated fields (on update events).
    pub previous_attributes: Option<serde_json::Value>,
}

/// Error envelope returned on non-2xx Stripe responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorEnvelope {
    pub error: StripeApiError,
}

/// Error body inside the envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    #[serde(rename = "type")]
    pub error_type: Option<String>,

    pub code: Option<String>,

    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_customer_object() {
        let json = r#"{
            "id": "cus_abc123",
            "object": "customer",
            "email": "ada@example.com",
            "name": "Ada Lovelace",
            "phone": "+61400000000",
            "created": 1704067200,
            "metadata": {}
        }"#;

        let customer: StripeCustomer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.id, "cus_abc123");
        assert_eq!(customer.email, Some("ada@example.com".to_string()));
        assert!(!customer.deleted);

        let gateway: GatewayCustomer = customer.into();
        assert_eq!(gateway.created, 1704067200);
    }

    #[test]
    fn parse_payment_method_with_card() {
        let json = r#"{
            "id": "pm_abc",
            "object": "payment_method",
            "type": "card",
            "customer": "cus_abc123",
            "created": 1704067200,
            "card": {
                "brand": "visa",
                "last4": "4242",
                "exp_month": 12,
                "exp_year": 2030,
                "funding": "credit",
                "country": "US",
                "fingerprint": "fp_x"
            },
            "billing_details": {
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": null
            }
        }"#;

        let method: StripePaymentMethod = serde_json::from_str(json).unwrap();
        assert_eq!(method.method_type, "card");

        let gateway: GatewayPaymentMethod = method.into();
        let card = gateway.card.unwrap();
        assert_eq!(card.brand, "visa");
        assert_eq!(card.last4, "4242");
        assert_eq!(card.exp_year, 2030);
        assert_eq!(gateway.billing.unwrap().name, Some("Ada Lovelace".to_string()));
    }

    #[test]
    fn parse_payment_intent() {
        let json = r#"{
            "id": "pi_abc",
            "object": "payment_intent",
            "client_secret": "pi_abc_secret_xyz",
            "status": "requires_payment_method",
            "amount": 5000,
            "currency": "usd",
            "customer": null,
            "metadata": {"payment_type": "one_time"}
        }"#;

        let intent: StripePaymentIntent = serde_json::from_str(json).unwrap();
        assert_eq!(intent.amount, 5000);
        assert_eq!(intent.metadata.get("payment_type").unwrap(), "one_time");

        let gateway: GatewayPaymentIntent = intent.into();
        assert_eq!(gateway.client_secret, Some("pi_abc_secret_xyz".to_string()));
        assert!(gateway.customer.is_none());
    }

    #[test]
    fn parse_list_of_payment_methods() {
        let json = r#"{
            "object": "list",
            "data": [
                {"id": "pm_1", "type": "card", "customer": "cus_1", "created": 1},
                {"id": "pm_2", "type": "card", "customer": "cus_1", "created": 2}
            ],
            "has_more": false
        }"#;

        let list: StripeList<StripePaymentMethod> = serde_json::from_str(json).unwrap();
        assert_eq!(list.data.len(), 2);
        assert!(!list.has_more);
    }

    #[test]
    fn parse_webhook_envelope() {
        let json = r#"{
            "id": "evt_123",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "data": {
                "object": {
                    "id": "pi_abc",
                    "status": "succeeded",
                    "amount": 5000,
                    "currency": "usd"
                }
            },
            "livemode": false
        }"#;

        let event: StripeWebhookEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(event.data.object["id"], "pi_abc");
    }

    #[test]
    fn parse_error_envelope() {
        let json = r#"{
            "error": {
                "type": "invalid_request_error",
                "code": "resource_missing",
                "message": "No such customer: 'cus_missing'"
            }
        }"#;

        let envelope: StripeErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.error.code, Some("resource_missing".to_string()));
        assert!(envelope.error.message.unwrap().contains("cus_missing"));
    }
}
