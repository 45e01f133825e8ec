//! In-memory gateway for tests.
//!
//! A stateful stand-in for the hosted platform: customers, payment methods
//! and intents live in a mutex-held map with gateway-shaped ids. Tests seed
//! state up front and assert on the recorded intent parameters afterwards.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::CustomerRegistration;
use crate::ports::{
    CardDetails, CreateIntentParams, GatewayCustomer, GatewayError, GatewayPaymentIntent,
    GatewayPaymentMethod, GatewaySetupIntent, PaymentGateway,
};

/// Stateful in-memory implementation of the gateway port.
#[derive(Default)]
pub struct MockGateway {
    inner: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    customers: HashMap<String, GatewayCustomer>,
    methods: HashMap<String, GatewayPaymentMethod>,
    intents: HashMap<String, RecordedIntent>,
    next_id: u64,
}

/// A created payment intent together with the parameters that created it.
struct RecordedIntent {
    intent: GatewayPaymentIntent,
    params: CreateIntentParams,
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_{}", prefix, self.next_id)
    }
}

fn missing(resource: &str, id: &str) -> GatewayError {
    GatewayError::provider(format!("No such {}: '{}'", resource, id))
        .with_provider_code("resource_missing")
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of customers currently held.
    pub fn customer_count(&self) -> usize {
        self.inner.lock().unwrap().customers.len()
    }

    /// Insert a customer directly, returning its id.
    pub fn seed_customer(&self, email: &str, name: &str) -> String {
        let mut state = self.inner.lock().unwrap();
        let id = state.next_id("cus");
        state.customers.insert(
            id.clone(),
            GatewayCustomer {
                id: id.clone(),
                name: Some(name.to_string()),
                email: Some(email.to_string()),
                phone: None,
                created: 1_704_067_200,
            },
        );
        id
    }

    /// Attach a card-type payment method to a customer, returning its id.
    pub fn attach_card(&self, customer_id: &str, brand: &str, last4: &str) -> String {
        let mut state = self.inner.lock().unwrap();
        let id = state.next_id("pm");
        state.methods.insert(
            id.clone(),
            GatewayPaymentMethod {
                id: id.clone(),
                method_type: "card".to_string(),
                customer: Some(customer_id.to_string()),
                created: 1_704_067_200,
                card: Some(CardDetails {
                    brand: brand.to_string(),
                    last4: last4.to_string(),
                    exp_month: 12,
                    exp_year: 2030,
                    funding: Some("credit".to_string()),
                    country: Some("US".to_string()),
                    fingerprint: None,
                }),
                billing: None,
            },
        );
        id
    }

    /// The parameters a payment intent was created with.
    pub fn intent(&self, payment_intent_id: &str) -> Option<CreateIntentParams> {
        self.inner
            .lock()
            .unwrap()
            .intents
            .get(payment_intent_id)
            .map(|r| r.params.clone())
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_customer(
        &self,
        registration: &CustomerRegistration,
    ) -> Result<GatewayCustomer, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        let id = state.next_id("cus");
        let customer = GatewayCustomer {
            id: id.clone(),
            name: Some(registration.name.clone()),
            email: Some(registration.email.clone()),
            phone: registration.phone.clone(),
            created: 1_704_067_200,
        };
        state.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn get_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<GatewayCustomer>, GatewayError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .customers
            .get(customer_id)
            .cloned())
    }

    async fn update_customer(
        &self,
        customer_id: &str,
        registration: &CustomerRegistration,
    ) -> Result<GatewayCustomer, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        let customer = state
            .customers
            .get_mut(customer_id)
            .ok_or_else(|| missing("customer", customer_id))?;

        customer.name = Some(registration.name.clone());
        customer.email = Some(registration.email.clone());
        customer.phone = registration.phone.clone();
        Ok(customer.clone())
    }

    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<GatewayCustomer>, GatewayError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .customers
            .values()
            .find(|c| c.email.as_deref() == Some(email))
            .cloned())
    }

    async fn list_card_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<GatewayPaymentMethod>, GatewayError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .methods
            .values()
            .filter(|m| m.customer.as_deref() == Some(customer_id) && m.method_type == "card")
            .cloned()
            .collect())
    }

    async fn get_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<Option<GatewayPaymentMethod>, GatewayError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .methods
            .get(payment_method_id)
            .cloned())
    }

    async fn detach_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<GatewayPaymentMethod, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        let mut method = state
            .methods
            .remove(payment_method_id)
            .ok_or_else(|| missing("payment_method", payment_method_id))?;

        method.customer = None;
        Ok(method)
    }

    async fn create_setup_intent(
        &self,
        customer_id: &str,
    ) -> Result<GatewaySetupIntent, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        if !state.customers.contains_key(customer_id) {
            return Err(missing("customer", customer_id));
        }

        let id = state.next_id("seti");
        Ok(GatewaySetupIntent {
            client_secret: Some(format!("{}_secret_mock", id)),
            id,
            status: "requires_payment_method".to_string(),
            customer: Some(customer_id.to_string()),
        })
    }

    async fn create_payment_intent(
        &self,
        params: CreateIntentParams,
    ) -> Result<GatewayPaymentIntent, GatewayError> {
        let mut state = self.inner.lock().unwrap();

        if let Some(customer) = &params.customer {
            if !state.customers.contains_key(customer) {
                return Err(missing("customer", customer));
            }
        }

        let id = state.next_id("pi");
        let status = if params.confirm {
            "succeeded"
        } else {
            "requires_payment_method"
        };

        let intent = GatewayPaymentIntent {
            id: id.clone(),
            client_secret: Some(format!("{}_secret_mock", id)),
            status: status.to_string(),
            amount: params.amount,
            currency: params.currency.clone(),
            customer: params.customer.clone(),
        };

        state.intents.insert(
            id,
            RecordedIntent {
                intent: intent.clone(),
                params,
            },
        );

        Ok(intent)
    }

    async fn confirm_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<GatewayPaymentIntent, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        let recorded = state
            .intents
            .get_mut(payment_intent_id)
            .ok_or_else(|| missing("payment_intent", payment_intent_id))?;

        recorded.intent.status = "succeeded".to_string();
        Ok(recorded.intent.clone())
    }

    async fn get_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<GatewayPaymentIntent>, GatewayError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .intents
            .get(payment_intent_id)
            .map(|r| r.intent.clone()))
    }
}
