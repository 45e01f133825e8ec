//! Stripe gateway configuration
//!
//! The secret key is required at startup since every gateway call needs it.
//! The publishable key and webhook secret are allowed to be absent: the
//! configuration endpoint reports 400 and signature verification reports
//! failure at runtime instead, matching the diagnostic endpoints' contract.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Stripe gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSettings {
    /// Stripe secret API key (sk_test_... or sk_live_...)
    pub secret_key: SecretString,

    /// Stripe publishable key, safe to expose to browsers (pk_...)
    #[serde(default)]
    pub publishable_key: String,

    /// Webhook signing secret (whsec_...)
    #[serde(default)]
    pub webhook_secret: Option<SecretString>,

    /// Base URL for the Stripe API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Return URL for redirect-based authentication steps (3D Secure)
    #[serde(default = "default_return_url")]
    pub return_url: String,
}

impl StripeSettings {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.secret_key.expose_secret().starts_with("sk_live_")
    }

    /// Environment label derived from the publishable key, for the frontend.
    pub fn environment_label(&self) -> &'static str {
        if self.publishable_key.starts_with("pk_live_") {
            "live"
        } else {
            "test"
        }
    }

    /// Whether a publishable key has been configured.
    pub fn has_publishable_key(&self) -> bool {
        !self.publishable_key.is_empty()
    }

    /// Whether a webhook signing secret has been configured.
    pub fn has_webhook_secret(&self) -> bool {
        self.webhook_secret
            .as_ref()
            .map(|s| !s.expose_secret().is_empty())
            .unwrap_or(false)
    }

    /// Validate Stripe configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret = self.secret_key.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SECRET_KEY"));
        }
        if !secret.starts_with("sk_") && !secret.starts_with("rk_") {
            return Err(ValidationError::InvalidSecretKey);
        }

        if !self.publishable_key.is_empty() && !self.publishable_key.starts_with("pk_") {
            return Err(ValidationError::InvalidPublishableKey);
        }

        if let Some(whsec) = &self.webhook_secret {
            let whsec = whsec.expose_secret();
            if !whsec.is_empty() && !whsec.starts_with("whsec_") {
                return Err(ValidationError::InvalidWebhookSecret);
            }
        }

        if !self.return_url.starts_with("http://") && !self.return_url.starts_with("https://") {
            return Err(ValidationError::InvalidReturnUrl);
        }

        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_return_url() -> String {
    "http://localhost:8080/payment/return".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(secret: &str, publishable: &str, whsec: Option<&str>) -> StripeSettings {
        StripeSettings {
            secret_key: SecretString::new(secret.to_string()),
            publishable_key: publishable.to_string(),
            webhook_secret: whsec.map(|s| SecretString::new(s.to_string())),
            api_base_url: default_api_base_url(),
            return_url: default_return_url(),
        }
    }

    #[test]
    fn test_mode_detected_from_secret_key() {
        let config = settings("sk_test_xxx", "pk_test_xxx", Some("whsec_xxx"));
        assert!(config.is_test_mode());
        assert!(!config.is_live_mode());
    }

    #[test]
    fn environment_label_follows_publishable_key() {
        assert_eq!(
            settings("sk_live_x", "pk_live_x", None).environment_label(),
            "live"
        );
        assert_eq!(
            settings("sk_test_x", "pk_test_x", None).environment_label(),
            "test"
        );
    }

    #[test]
    fn missing_secret_key_fails_validation() {
        let config = settings("", "pk_test_xxx", None);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn wrong_secret_key_prefix_fails_validation() {
        let config = settings("pk_test_xxx", "", None);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidSecretKey)
        ));
    }

    #[test]
    fn wrong_webhook_secret_prefix_fails_validation() {
        let config = settings("sk_test_xxx", "", Some("secret_xxx"));
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidWebhookSecret)
        ));
    }

    #[test]
    fn absent_webhook_secret_is_allowed() {
        let config = settings("sk_test_xxx", "pk_test_xxx", None);
        assert!(config.validate().is_ok());
        assert!(!config.has_webhook_secret());
    }

    #[test]
    fn valid_config_passes() {
        let config = settings("sk_test_abcd1234", "pk_test_abcd", Some("whsec_xyz789"));
        assert!(config.validate().is_ok());
        assert!(config.has_publishable_key());
        assert!(config.has_webhook_secret());
    }
}
