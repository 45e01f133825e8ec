//! Customer orchestration.
//!
//! Finds-or-creates gateway customers by email and assembles profiles with
//! their attached card payment methods. Nothing is cached; every call round
//! trips to the gateway.

use std::sync::Arc;

use crate::domain::{
    CustomerProfile, CustomerRegistration, SavedPaymentMethod, ServiceError, SetupIntentSecret,
};
use crate::ports::{GatewayCustomer, GatewayPaymentMethod, PaymentGateway};

/// Orchestrates customer operations against the injected gateway client.
pub struct CustomerOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
}

impl CustomerOrchestrator {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    /// Look up a customer by email; reuse it if found, create it otherwise.
    ///
    /// Two rapid concurrent calls with the same new email may race and create
    /// two customers: there is no locking and no idempotency key, the
    /// provider's store is the only arbiter.
    pub async fn find_or_create(
        &self,
        registration: &CustomerRegistration,
    ) -> Result<CustomerProfile, ServiceError> {
        if let Some(existing) = self
            .gateway
            .find_customer_by_email(&registration.email)
            .await?
        {
            tracing::info!(customer_id = %existing.id, email = %registration.email,
                "Customer already exists, reusing");
            return self.profile_with_methods(&existing.id).await;
        }

        let customer = self.gateway.create_customer(registration).await?;
        tracing::info!(customer_id = %customer.id, "Customer created");

        Ok(profile_from(customer, Vec::new()))
    }

    /// Fetch a customer and its attached card payment methods.
    pub async fn profile_with_methods(
        &self,
        customer_id: &str,
    ) -> Result<CustomerProfile, ServiceError> {
        let customer = self
            .gateway
            .get_customer(customer_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("customer"))?;

        let methods = self.gateway.list_card_methods(customer_id).await?;

        Ok(profile_from(
            customer,
            methods.into_iter().map(saved_method_from).collect(),
        ))
    }

    /// Look up a customer by email, profile included.
    pub async fn profile_by_email(&self, email: &str) -> Result<CustomerProfile, ServiceError> {
        let customer = self
            .gateway
            .find_customer_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::not_found("customer"))?;

        self.profile_with_methods(&customer.id).await
    }

    /// List a customer's saved card payment methods.
    pub async fn saved_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<SavedPaymentMethod>, ServiceError> {
        let methods = self.gateway.list_card_methods(customer_id).await?;
        Ok(methods.into_iter().map(saved_method_from).collect())
    }

    /// Request a setup intent for saving a card, off-session future usage.
    pub async fn create_setup_intent(
        &self,
        customer_id: &str,
    ) -> Result<SetupIntentSecret, ServiceError> {
        let intent = self.gateway.create_setup_intent(customer_id).await?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            ServiceError::unexpected("gateway returned a setup intent without a client secret")
        })?;

        tracing::info!(setup_intent_id = %intent.id, customer_id, "Setup intent created");

        Ok(SetupIntentSecret {
            client_secret,
            setup_intent_id: intent.id,
        })
    }

    /// Detach a payment method from its customer.
    ///
    /// Repeated calls on an already-detached method surface the gateway's own
    /// error; there is no special handling here.
    pub async fn detach_method(&self, payment_method_id: &str) -> Result<(), ServiceError> {
        self.gateway.detach_payment_method(payment_method_id).await?;
        tracing::info!(payment_method_id, "Payment method detached");
        Ok(())
    }

    /// Overwrite a customer's name, email and phone.
    pub async fn update(
        &self,
        customer_id: &str,
        registration: &CustomerRegistration,
    ) -> Result<CustomerProfile, ServiceError> {
        let customer = self
            .gateway
            .update_customer(customer_id, registration)
            .await?;

        let methods = self.gateway.list_card_methods(customer_id).await?;

        Ok(profile_from(
            customer,
            methods.into_iter().map(saved_method_from).collect(),
        ))
    }
}

fn profile_from(customer: GatewayCustomer, methods: Vec<SavedPaymentMethod>) -> CustomerProfile {
    CustomerProfile {
        customer_id: customer.id,
        name: customer.name.unwrap_or_default(),
        email: customer.email.unwrap_or_default(),
        phone: customer.phone,
        saved_payment_methods: methods,
    }
}

fn saved_method_from(method: GatewayPaymentMethod) -> SavedPaymentMethod {
    let card = method.card;
    SavedPaymentMethod {
        id: method.id,
        method_type: method.method_type,
        brand: card.as_ref().map(|c| c.brand.clone()).unwrap_or_default(),
        last4: card.as_ref().map(|c| c.last4.clone()).unwrap_or_default(),
        exp_month: card.as_ref().map(|c| c.exp_month).unwrap_or(0),
        exp_year: card.as_ref().map(|c| c.exp_year).unwrap_or(0),
    }
}
