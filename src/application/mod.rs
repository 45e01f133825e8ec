//! Orchestration layer: use cases composed from the gateway and verifier
//! ports, free of HTTP and wire concerns.

pub mod customers;
pub mod payments;
pub mod webhooks;

pub use customers::CustomerOrchestrator;
pub use payments::PaymentOrchestrator;
pub use webhooks::WebhookDispatcher;
