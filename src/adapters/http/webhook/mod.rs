//! Webhook endpoints.
//!
//! - `POST /api/webhooks/stripe` - signature-verified event intake
//! - `GET /api/webhooks/stripe/status` - configuration diagnostic

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::webhook_routes;
