//! Customer endpoints.
//!
//! - `POST /api/customers` - find-or-create by email
//! - `GET /api/customers/:id` - profile with saved methods
//! - `GET /api/customers/by-email/:email`
//! - `PUT /api/customers/:id` - overwrite contact details
//! - `GET /api/customers/:id/payment-methods`
//! - `POST /api/customers/:id/setup-intent`
//! - `DELETE /api/customers/payment-methods/:pm_id`

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::customer_routes;
