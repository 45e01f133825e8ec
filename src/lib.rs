//! Payportal - Payment Gateway Integration Proof of Concept
//!
//! This crate wraps the Stripe hosted APIs behind a small REST surface:
//! customer management, saved payment methods, payment and setup intents,
//! and signed webhook dispatch.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
