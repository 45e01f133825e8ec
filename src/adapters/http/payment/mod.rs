//! Payment endpoints.
//!
//! - `POST /api/payments/intent` - full payment flow
//! - `POST /api/payments/intent/saved-method` - charge a saved method
//! - `POST /api/payments/intent/simple` - direct options passthrough
//! - `POST /api/payments/intent/:id/confirm`
//! - `GET /api/payments/intent/:id`
//! - `GET /api/payments/methods/:id` / `DELETE /api/payments/methods/:id`
//! - `GET /api/payments/saved-methods/:customer_id`

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::payment_routes;
