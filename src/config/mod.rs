//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `PAYPORTAL` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use payportal::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod server;
mod stripe;

pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use stripe::StripeSettings;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Stripe gateway configuration
    pub stripe: StripeSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads environment variables with
    /// the `PAYPORTAL` prefix. `__` separates nested values:
    ///
    /// - `PAYPORTAL__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PAYPORTAL__STRIPE__SECRET_KEY=sk_test_...` -> `stripe.secret_key`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAYPORTAL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.stripe.validate()?;
        Ok(())
    }
}
