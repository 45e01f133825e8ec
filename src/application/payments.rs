//! Payment orchestration.
//!
//! Decides per request whether to create a one-time intent, a
//! customer-scoped intent, or an intent using a previously saved method.
//! Amounts are integer minor units throughout; validation happens before
//! any gateway call.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{
    CustomerRegistration, IntentStatus, MinorUnits, PaymentReceipt, PaymentRequest, ServiceError,
    SimpleChargeRequest,
};
use crate::ports::{CreateIntentParams, GatewayPaymentMethod, PaymentGateway};

/// Orchestrates payment intent creation against the injected gateway client.
pub struct PaymentOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
    /// Return URL for redirect-based authentication steps (3D Secure).
    return_url: String,
}

impl PaymentOrchestrator {
    pub fn new(gateway: Arc<dyn PaymentGateway>, return_url: impl Into<String>) -> Self {
        Self {
            gateway,
            return_url: return_url.into(),
        }
    }

    /// Complete payment flow: resolve a customer if info was supplied, then
    /// create the right flavor of intent.
    pub async fn process_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentReceipt, ServiceError> {
        let customer_id = self.resolve_customer(request).await?;

        let mut metadata = HashMap::new();
        let params = match &customer_id {
            Some(id) => {
                metadata.insert("payment_type".to_string(), "customer_payment".to_string());
                metadata.insert(
                    "save_payment_method".to_string(),
                    request.save_payment_method.to_string(),
                );
                CreateIntentParams {
                    amount: request.amount.value(),
                    currency: request.currency.clone(),
                    customer: Some(id.clone()),
                    save_for_future_use: request.save_payment_method,
                    metadata,
                    ..Default::default()
                }
            }
            None => {
                metadata.insert("payment_type".to_string(), "one_time".to_string());
                CreateIntentParams {
                    amount: request.amount.value(),
                    currency: request.currency.clone(),
                    metadata,
                    ..Default::default()
                }
            }
        };

        let intent = self.gateway.create_payment_intent(params).await?;
        tracing::info!(
            payment_intent_id = %intent.id,
            amount = request.amount.value(),
            currency = %request.currency,
            customer_id = customer_id.as_deref().unwrap_or("-"),
            "Payment intent created"
        );

        Ok(PaymentReceipt {
            client_secret: require_secret(intent.client_secret)?,
            customer_id,
            payment_intent_id: intent.id,
        })
    }

    /// Create and immediately confirm an intent using a saved method.
    ///
    /// Manual confirmation flow with a configured return URL for any
    /// redirect-based authentication step; no second confirmation call is
    /// needed.
    pub async fn charge_saved_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
        amount: MinorUnits,
        currency: &str,
    ) -> Result<PaymentReceipt, ServiceError> {
        let mut metadata = HashMap::new();
        metadata.insert("payment_type".to_string(), "saved_method".to_string());
        metadata.insert(
            "payment_method_id".to_string(),
            payment_method_id.to_string(),
        );

        let intent = self
            .gateway
            .create_payment_intent(CreateIntentParams {
                amount: amount.value(),
                currency: currency.to_string(),
                customer: Some(customer_id.to_string()),
                payment_method: Some(payment_method_id.to_string()),
                confirm: true,
                manual_confirmation: true,
                return_url: Some(self.return_url.clone()),
                metadata,
                ..Default::default()
            })
            .await?;

        tracing::info!(
            payment_intent_id = %intent.id,
            customer_id,
            payment_method_id,
            status = %intent.status,
            "Saved-method payment intent created and confirmed"
        );

        Ok(PaymentReceipt {
            client_secret: require_secret(intent.client_secret)?,
            customer_id: Some(customer_id.to_string()),
            payment_intent_id: intent.id,
        })
    }

    /// Simplified intent creation: direct options passthrough.
    ///
    /// When no payment method is given the gateway picks eligible method
    /// types automatically.
    pub async fn create_simple_intent(
        &self,
        request: &SimpleChargeRequest,
    ) -> Result<PaymentReceipt, ServiceError> {
        let intent = self
            .gateway
            .create_payment_intent(CreateIntentParams {
                amount: request.amount.value(),
                currency: request.currency.clone(),
                customer: request.customer_id.clone(),
                payment_method: request.payment_method_id.clone(),
                automatic_payment_methods: request.payment_method_id.is_none(),
                save_for_future_use: request.save_payment_method,
                description: request.description.clone(),
                ..Default::default()
            })
            .await?;

        Ok(PaymentReceipt {
            client_secret: require_secret(intent.client_secret)?,
            customer_id: request.customer_id.clone(),
            payment_intent_id: intent.id,
        })
    }

    /// Confirm an intent, usually after a 3D Secure step.
    pub async fn confirm(&self, payment_intent_id: &str) -> Result<IntentStatus, ServiceError> {
        let intent = self.gateway.confirm_payment_intent(payment_intent_id).await?;
        Ok(IntentStatus {
            id: intent.id,
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency,
        })
    }

    /// Fetch an intent's current status.
    pub async fn get(&self, payment_intent_id: &str) -> Result<IntentStatus, ServiceError> {
        let intent = self
            .gateway
            .get_payment_intent(payment_intent_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("payment intent"))?;

        Ok(IntentStatus {
            id: intent.id,
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency,
        })
    }

    /// Fetch a payment method's full details.
    pub async fn get_method(
        &self,
        payment_method_id: &str,
    ) -> Result<GatewayPaymentMethod, ServiceError> {
        self.gateway
            .get_payment_method(payment_method_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("payment method"))
    }

    /// Detach a payment method from its customer.
    pub async fn detach_method(&self, payment_method_id: &str) -> Result<(), ServiceError> {
        self.gateway.detach_payment_method(payment_method_id).await?;
        Ok(())
    }

    async fn resolve_customer(
        &self,
        request: &PaymentRequest,
    ) -> Result<Option<String>, ServiceError> {
        if let Some(id) = &request.existing_customer_id {
            return Ok(Some(id.clone()));
        }

        let Some(info) = &request.customer else {
            return Ok(None);
        };

        if let Some(existing) = self.gateway.find_customer_by_email(&info.email).await? {
            tracing::info!(customer_id = %existing.id, "Reusing customer for payment");
            return Ok(Some(existing.id));
        }

        let created = self
            .gateway
            .create_customer(&CustomerRegistration {
                name: info.name.clone(),
                email: info.email.clone(),
                phone: info.phone.clone(),
            })
            .await?;
        tracing::info!(customer_id = %created.id, "Created customer for payment");

        Ok(Some(created.id))
    }
}

fn require_secret(client_secret: Option<String>) -> Result<String, ServiceError> {
    client_secret.ok_or_else(|| {
        ServiceError::unexpected("gateway returned a payment intent without a client secret")
    })
}
