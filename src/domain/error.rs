//! Service error taxonomy.
//!
//! Every fault surfaced by the orchestrators falls into one of four classes,
//! mapped by the HTTP layer: validation -> 400, not found -> 404, gateway ->
//! 400 with the provider's message, unexpected -> 500 with a generic message.

use thiserror::Error;

/// Error raised by orchestrator operations.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Malformed or semantically invalid input.
    #[error("validation failed for {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// A referenced resource does not exist in the gateway.
    #[error("{0} not found")]
    NotFound(String),

    /// The external platform rejected or failed a call.
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        /// Provider-assigned error code, when one was supplied.
        provider_code: Option<String>,
    },

    /// Any other fault. Details are logged server-side only.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway {
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
