//! Webhook event shapes.
//!
//! Events arrive as provider-signed JSON envelopes. The string type tag is
//! decoded once, at the gateway adapter boundary, into the closed [`EventKind`]
//! enum; everything downstream dispatches on the enum. Events are processed
//! and discarded, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The twelve recognized event kinds, plus a fallback for anything else.
///
/// Unknown kinds are accepted and acknowledged, never rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    PaymentSucceeded,
    PaymentFailed,
    PaymentRequiresAction,
    SetupSucceeded,
    SetupFailed,
    CustomerCreated,
    CustomerUpdated,
    CustomerDeleted,
    MethodAttached,
    MethodDetached,
    InvoicePaymentSucceeded,
    InvoicePaymentFailed,
    Unknown(String),
}

/// Provider type tags for every recognized kind, in dispatch order.
pub const RECOGNIZED_EVENT_TYPES: [&str; 12] = [
    "payment_intent.succeeded",
    "payment_intent.payment_failed",
    "payment_intent.requires_action",
    "setup_intent.succeeded",
    "setup_intent.setup_failed",
    "customer.created",
    "customer.updated",
    "customer.deleted",
    "payment_method.attached",
    "payment_method.detached",
    "invoice.payment_succeeded",
    "invoice.payment_failed",
];

impl EventKind {
    /// Decode a provider type tag.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "payment_intent.succeeded" => Self::PaymentSucceeded,
            "payment_intent.payment_failed" => Self::PaymentFailed,
            "payment_intent.requires_action" => Self::PaymentRequiresAction,
            "setup_intent.succeeded" => Self::SetupSucceeded,
            "setup_intent.setup_failed" => Self::SetupFailed,
            "customer.created" => Self::CustomerCreated,
            "customer.updated" => Self::CustomerUpdated,
            "customer.deleted" => Self::CustomerDeleted,
            "payment_method.attached" => Self::MethodAttached,
            "payment_method.detached" => Self::MethodDetached,
            "invoice.payment_succeeded" => Self::InvoicePaymentSucceeded,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The provider's type tag for this kind.
    pub fn tag(&self) -> &str {
        match self {
            Self::PaymentSucceeded => "payment_intent.succeeded",
            Self::PaymentFailed => "payment_intent.payment_failed",
            Self::PaymentRequiresAction => "payment_intent.requires_action",
            Self::SetupSucceeded => "setup_intent.succeeded",
            Self::SetupFailed => "setup_intent.setup_failed",
            Self::CustomerCreated => "customer.created",
            Self::CustomerUpdated => "customer.updated",
            Self::CustomerDeleted => "customer.deleted",
            Self::MethodAttached => "payment_method.attached",
            Self::MethodDetached => "payment_method.detached",
            Self::InvoicePaymentSucceeded => "invoice.payment_succeeded",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::Unknown(tag) => tag,
        }
    }
}

/// The object embedded in an event envelope, decoded per kind.
///
/// When the payload does not decode as the object its type tag promises,
/// the raw JSON is kept under `Unrecognized` and the dispatcher reports a
/// processing failure for recognized kinds.
#[derive(Debug, Clone)]
pub enum EventObject {
    PaymentIntent {
        id: String,
        customer: Option<String>,
        amount: i64,
        currency: String,
        status: String,
        failure_message: Option<String>,
    },
    SetupIntent {
        id: String,
        customer: Option<String>,
        status: String,
    },
    Customer {
        id: String,
        email: Option<String>,
        name: Option<String>,
    },
    PaymentMethod {
        id: String,
        customer: Option<String>,
        method_type: String,
    },
    Invoice {
        id: String,
        customer: Option<String>,
        amount_paid: i64,
        currency: String,
        status: String,
    },
    Unrecognized(serde_json::Value),
}

impl EventObject {
    /// Gateway id of the embedded object, when one is present.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::PaymentIntent { id, .. }
            | Self::SetupIntent { id, .. }
            | Self::Customer { id, .. }
            | Self::PaymentMethod { id, .. }
            | Self::Invoice { id, .. } => Some(id),
            Self::Unrecognized(value) => value.get("id").and_then(|v| v.as_str()),
        }
    }
}

/// A provider-signed notification, decoded and ready for dispatch.
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    /// Provider event id (evt_...).
    pub id: String,

    /// Decoded event kind.
    pub kind: EventKind,

    /// Unix timestamp when the provider generated the event.
    pub created: i64,

    /// Whether this is a live-mode event.
    pub live_mode: bool,

    /// The embedded object the event describes.
    pub object: EventObject,
}

/// Outcome of dispatching one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Whether the handler acknowledged the event.
    pub success: bool,

    /// Human-readable outcome, referencing the embedded object's id.
    pub message: String,

    /// Failure detail, present only when `success` is false.
    pub error_details: Option<String>,

    /// When dispatch finished.
    pub processed_at: DateTime<Utc>,
}

impl ProcessingResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_details: None,
            processed_at: Utc::now(),
        }
    }

    pub fn failed(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_details: Some(details.into()),
            processed_at: Utc::now(),
        }
    }
}
