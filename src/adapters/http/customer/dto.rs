//! JSON shapes for the customer endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::{CustomerProfile, CustomerRegistration, SavedPaymentMethod, ServiceError, SetupIntentSecret};

/// Request body for create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CustomerRequest {
    /// Validate and convert into the domain registration.
    pub fn into_registration(self) -> Result<CustomerRegistration, ServiceError> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::validation("name", "must not be empty"));
        }
        if self.email.trim().is_empty() {
            return Err(ServiceError::validation("email", "must not be empty"));
        }
        if !self.email.contains('@') {
            return Err(ServiceError::validation("email", "must be an email address"));
        }

        Ok(CustomerRegistration {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.filter(|p| !p.trim().is_empty()),
        })
    }
}

/// Customer profile with saved card methods.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerProfileResponse {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub saved_payment_methods: Vec<SavedMethodResponse>,
}

impl From<CustomerProfile> for CustomerProfileResponse {
    fn from(profile: CustomerProfile) -> Self {
        Self {
            customer_id: profile.customer_id,
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            saved_payment_methods: profile
                .saved_payment_methods
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// One saved card method.
#[derive(Debug, Clone, Serialize)]
pub struct SavedMethodResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub method_type: String,
    pub brand: String,
    pub last4: String,
    pub exp_month: i64,
    pub exp_year: i64,
}

impl From<SavedPaymentMethod> for SavedMethodResponse {
    fn from(method: SavedPaymentMethod) -> Self {
        Self {
            id: method.id,
            method_type: method.method_type,
            brand: method.brand,
            last4: method.last4,
            exp_month: method.exp_month,
            exp_year: method.exp_year,
        }
    }
}

/// Setup intent handed to the browser for card tokenization.
#[derive(Debug, Clone, Serialize)]
pub struct SetupIntentResponse {
    pub client_secret: String,
    pub setup_intent_id: String,
}

impl From<SetupIntentSecret> for SetupIntentResponse {
    fn from(secret: SetupIntentSecret) -> Self {
        Self {
            client_secret: secret.client_secret,
            setup_intent_id: secret.setup_intent_id,
        }
    }
}
