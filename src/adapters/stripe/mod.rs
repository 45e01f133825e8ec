//! Stripe adapter: REST client, webhook verifier and test double.

pub mod client;
pub mod mock;
pub mod signature;
pub mod types;

pub use client::{StripeGateway, StripeWebhookVerifier};
pub use mock::MockGateway;
