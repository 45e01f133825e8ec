//! Domain types - transient request/response shapes.
//!
//! Nothing here is persisted; the gateway is the system of record and every
//! value's lifetime is a single request/response cycle.

mod customer;
mod error;
mod money;
mod payment;
mod webhook;

pub use customer::{CustomerProfile, CustomerRegistration, SavedPaymentMethod};
pub use error::ServiceError;
pub use money::{MinorUnits, DEFAULT_CURRENCY, SUPPORTED_CURRENCIES};
pub use payment::{
    IntentStatus, PaymentReceipt, PaymentRequest, SetupIntentSecret, SimpleChargeRequest,
};
pub use webhook::{
    EventKind, EventObject, ProcessingResult, WebhookEvent, RECOGNIZED_EVENT_TYPES,
};
