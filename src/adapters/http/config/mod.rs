//! Configuration endpoints.
//!
//! - `GET /api/config/stripe` - publishable key and environment label
//! - `GET /api/config/app` - app metadata, currencies, feature flags

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::config_routes;
