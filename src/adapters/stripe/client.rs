//! Stripe REST client and webhook verifier.
//!
//! Talks to the Stripe REST API with form-encoded requests over the injected
//! `reqwest` client. Every trait method is one remote call; there are no
//! retries and no caching.
//!
//! # Security
//!
//! - HMAC-SHA256 webhook signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::StripeSettings;
use crate::domain::{CustomerRegistration, EventKind, EventObject, WebhookEvent};
use crate::ports::{
    CreateIntentParams, GatewayCustomer, GatewayError, GatewayPaymentIntent, GatewayPaymentMethod,
    GatewaySetupIntent, PaymentGateway, WebhookVerifier, WebhookVerifyError,
};

use super::signature::SignatureHeader;
use super::types::{
    StripeCustomer, StripeErrorEnvelope, StripeInvoice, StripeList, StripePaymentIntent,
    StripePaymentMethod, StripeSetupIntent, StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Stripe implementation of the payment gateway port.
pub struct StripeGateway {
    settings: StripeSettings,
    http_client: reqwest::Client,
}

impl StripeGateway {
    pub fn new(settings: StripeSettings) -> Self {
        Self {
            settings,
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.settings.api_base_url, path)
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, GatewayError> {
        let response = self
            .http_client
            .post(self.url(path))
            .basic_auth(
                self.settings.secret_key.expose_secret(),
                Option::<&str>::None,
            )
            .form(params)
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        Self::decode_response(path, response).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, GatewayError> {
        let response = self
            .http_client
            .get(self.url(path))
            .basic_auth(
                self.settings.secret_key.expose_secret(),
                Option::<&str>::None,
            )
            .query(query)
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::decode_response(path, response).await.map(Some)
    }

    async fn decode_response<T: serde::de::DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(path, status = %status, error = %body, "Stripe API call failed");
            return Err(Self::provider_error(&body));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::decode(format!("failed to parse Stripe response: {}", e)))
    }

    /// Turn a non-2xx body into a provider error, pulling the message and
    /// code out of the error envelope when it decodes.
    fn provider_error(body: &str) -> GatewayError {
        match serde_json::from_str::<StripeErrorEnvelope>(body) {
            Ok(envelope) => {
                let message = envelope
                    .error
                    .message
                    .unwrap_or_else(|| "Stripe API error".to_string());
                let err = GatewayError::provider(message);
                match envelope.error.code {
                    Some(code) => err.with_provider_code(code),
                    None => err,
                }
            }
            Err(_) => GatewayError::provider(format!("Stripe API error: {}", body)),
        }
    }

    fn customer_params(registration: &CustomerRegistration) -> Vec<(String, String)> {
        let mut params = vec![
            ("name".to_string(), registration.name.clone()),
            ("email".to_string(), registration.email.clone()),
        ];

        if let Some(phone) = &registration.phone {
            params.push(("phone".to_string(), phone.clone()));
        }

        params
    }

    fn intent_params(params: CreateIntentParams) -> Vec<(String, String)> {
        let mut form = vec![
            ("amount".to_string(), params.amount.to_string()),
            ("currency".to_string(), params.currency),
        ];

        if let Some(customer) = params.customer {
            form.push(("customer".to_string(), customer));
        }

        if let Some(payment_method) = params.payment_method {
            form.push(("payment_method".to_string(), payment_method));
        }

        if params.save_for_future_use {
            form.push(("setup_future_usage".to_string(), "off_session".to_string()));
        }

        if params.confirm {
            form.push(("confirm".to_string(), "true".to_string()));
        }

        if params.manual_confirmation {
            form.push(("confirmation_method".to_string(), "manual".to_string()));
        }

        if let Some(return_url) = params.return_url {
            form.push(("return_url".to_string(), return_url));
        }

        if params.automatic_payment_methods {
            form.push((
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ));
        }

        if let Some(description) = params.description {
            form.push(("description".to_string(), description));
        }

        for (key, value) in params.metadata {
            form.push((format!("metadata[{}]", key), value));
        }

        form
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_customer(
        &self,
        registration: &CustomerRegistration,
    ) -> Result<GatewayCustomer, GatewayError> {
        let customer: StripeCustomer = self
            .post_form("customers", &Self::customer_params(registration))
            .await?;

        Ok(customer.into())
    }

    async fn get_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<GatewayCustomer>, GatewayError> {
        let customer: Option<StripeCustomer> = self
            .get_json(&format!("customers/{}", customer_id), &[])
            .await?;

        Ok(customer.filter(|c| !c.deleted).map(Into::into))
    }

    async fn update_customer(
        &self,
        customer_id: &str,
        registration: &CustomerRegistration,
    ) -> Result<GatewayCustomer, GatewayError> {
        let customer: StripeCustomer = self
            .post_form(
                &format!("customers/{}", customer_id),
                &Self::customer_params(registration),
            )
            .await?;

        Ok(customer.into())
    }

    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<GatewayCustomer>, GatewayError> {
        let list: Option<StripeList<StripeCustomer>> = self
            .get_json("customers", &[("email", email), ("limit", "1")])
            .await?;

        Ok(list
            .and_then(|l| l.data.into_iter().next())
            .map(Into::into))
    }

    async fn list_card_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<GatewayPaymentMethod>, GatewayError> {
        let list: Option<StripeList<StripePaymentMethod>> = self
            .get_json(
                "payment_methods",
                &[("customer", customer_id), ("type", "card")],
            )
            .await?;

        Ok(list
            .map(|l| l.data.into_iter().map(Into::into).collect())
            .unwrap_or_default())
    }

    async fn get_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<Option<GatewayPaymentMethod>, GatewayError> {
        let method: Option<StripePaymentMethod> = self
            .get_json(&format!("payment_methods/{}", payment_method_id), &[])
            .await?;

        Ok(method.map(Into::into))
    }

    async fn detach_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<GatewayPaymentMethod, GatewayError> {
        let method: StripePaymentMethod = self
            .post_form(&format!("payment_methods/{}/detach", payment_method_id), &[])
            .await?;

        Ok(method.into())
    }

    async fn create_setup_intent(
        &self,
        customer_id: &str,
    ) -> Result<GatewaySetupIntent, GatewayError> {
        let params = vec![
            ("customer".to_string(), customer_id.to_string()),
            (
                "payment_method_types[]".to_string(),
                "card".to_string(),
            ),
            ("usage".to_string(), "off_session".to_string()),
        ];

        let intent: StripeSetupIntent = self.post_form("setup_intents", &params).await?;

        Ok(intent.into())
    }

    async fn create_payment_intent(
        &self,
        params: CreateIntentParams,
    ) -> Result<GatewayPaymentIntent, GatewayError> {
        let intent: StripePaymentIntent = self
            .post_form("payment_intents", &Self::intent_params(params))
            .await?;

        Ok(intent.into())
    }

    async fn confirm_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<GatewayPaymentIntent, GatewayError> {
        let intent: StripePaymentIntent = self
            .post_form(&format!("payment_intents/{}/confirm", payment_intent_id), &[])
            .await?;

        Ok(intent.into())
    }

    async fn get_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<GatewayPaymentIntent>, GatewayError> {
        let intent: Option<StripePaymentIntent> = self
            .get_json(&format!("payment_intents/{}", payment_intent_id), &[])
            .await?;

        Ok(intent.map(Into::into))
    }
}

/// Stripe implementation of the webhook verifier port.
pub struct StripeWebhookVerifier {
    webhook_secret: Option<SecretString>,
}

impl StripeWebhookVerifier {
    pub fn new(webhook_secret: Option<SecretString>) -> Self {
        Self { webhook_secret }
    }

    fn check_signature(
        secret: &SecretString,
        payload: &[u8],
        header: &SignatureHeader,
    ) -> Result<(), WebhookVerifyError> {
        let now = chrono::Utc::now().timestamp();
        let age = now - header.timestamp;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                age_secs = age,
                "Webhook event too old - possible replay attack"
            );
            return Err(WebhookVerifyError::TimestampOutOfRange(age));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                "Webhook event from future - clock skew or manipulation"
            );
            return Err(WebhookVerifyError::TimestampOutOfRange(age));
        }

        let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(header.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        let expected = mac.finalize().into_bytes();

        let expected_bytes: &[u8] = expected.as_slice();
        let provided_bytes: &[u8] = &header.v1_signature;

        if expected_bytes.ct_eq(provided_bytes).unwrap_u8() != 1 {
            tracing::warn!(
                expected_signature = hex::encode(expected_bytes),
                "Invalid webhook signature"
            );
            return Err(WebhookVerifyError::SignatureMismatch);
        }

        Ok(())
    }

    fn decode_event(payload: &[u8]) -> Result<WebhookEvent, WebhookVerifyError> {
        let envelope: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse webhook payload");
            WebhookVerifyError::MalformedPayload(e.to_string())
        })?;

        let kind = EventKind::from_tag(&envelope.event_type);
        let object = decode_object(&kind, envelope.data.object);

        Ok(WebhookEvent {
            id: envelope.id,
            kind,
            created: envelope.created,
            live_mode: envelope.livemode,
            object,
        })
    }
}

impl WebhookVerifier for StripeWebhookVerifier {
    fn is_configured(&self) -> bool {
        self.webhook_secret.is_some()
    }

    fn verify_and_decode(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookEvent, WebhookVerifyError> {
        let secret = self
            .webhook_secret
            .as_ref()
            .ok_or(WebhookVerifyError::SecretNotConfigured)?;

        let header = SignatureHeader::parse(signature_header).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse Stripe-Signature header");
            WebhookVerifyError::MalformedHeader(e.to_string())
        })?;

        Self::check_signature(secret, payload, &header)?;

        let event = Self::decode_event(payload)?;

        tracing::info!(
            event_id = %event.id,
            event_type = %event.kind.tag(),
            "Webhook signature verified"
        );

        Ok(event)
    }
}

/// Decode the embedded object into the shape its type tag promises, keeping
/// the raw JSON when it does not fit.
fn decode_object(kind: &EventKind, object: serde_json::Value) -> EventObject {
    match kind {
        EventKind::PaymentSucceeded
        | EventKind::PaymentFailed
        | EventKind::PaymentRequiresAction => {
            match serde_json::from_value::<StripePaymentIntent>(object.clone()) {
                Ok(pi) => EventObject::PaymentIntent {
                    id: pi.id,
                    customer: pi.customer,
                    amount: pi.amount,
                    currency: pi.currency,
                    status: pi.status,
                    failure_message: pi.last_payment_error.and_then(|e| e.message),
                },
                Err(_) => EventObject::Unrecognized(object),
            }
        }
        EventKind::SetupSucceeded | EventKind::SetupFailed => {
            match serde_json::from_value::<StripeSetupIntent>(object.clone()) {
                Ok(si) => EventObject::SetupIntent {
                    id: si.id,
                    customer: si.customer,
                    status: si.status,
                },
                Err(_) => EventObject::Unrecognized(object),
            }
        }
        EventKind::CustomerCreated | EventKind::CustomerUpdated | EventKind::CustomerDeleted => {
            match serde_json::from_value::<StripeCustomer>(object.clone()) {
                Ok(c) => EventObject::Customer {
                    id: c.id,
                    email: c.email,
                    name: c.name,
                },
                Err(_) => EventObject::Unrecognized(object),
            }
        }
        EventKind::MethodAttached | EventKind::MethodDetached => {
            match serde_json::from_value::<StripePaymentMethod>(object.clone()) {
                Ok(pm) => EventObject::PaymentMethod {
                    id: pm.id,
                    customer: pm.customer,
                    method_type: pm.method_type,
                },
                Err(_) => EventObject::Unrecognized(object),
            }
        }
        EventKind::InvoicePaymentSucceeded | EventKind::InvoicePaymentFailed => {
            match serde_json::from_value::<StripeInvoice>(object.clone()) {
                Ok(invoice) => EventObject::Invoice {
                    id: invoice.id,
                    customer: invoice.customer,
                    amount_paid: invoice.amount_paid,
                    currency: invoice.currency,
                    status: invoice.status,
                },
                Err(_) => EventObject::Unrecognized(object),
            }
        }
        EventKind::Unknown(_) => EventObject::Unrecognized(object),
    }
}
