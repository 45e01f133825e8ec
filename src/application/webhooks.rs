//! Webhook dispatch.
//!
//! A single-step classify-and-handle per event, stateless across calls.
//! Handlers are explicit stubs: they log, wait a fixed stand-in delay where
//! real fulfillment work would run, and acknowledge. No retry, no
//! dead-lettering, no ordering or deduplication; redelivery is entirely the
//! provider's responsibility.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{EventKind, EventObject, ProcessingResult, WebhookEvent};
use crate::ports::{WebhookVerifier, WebhookVerifyError};

/// Fixed delay standing in for real handler work.
const HANDLER_DELAY: Duration = Duration::from_millis(100);

/// Routes verified events to per-kind stub handlers.
pub struct WebhookDispatcher {
    verifier: Arc<dyn WebhookVerifier>,
    handler_delay: Duration,
}

impl WebhookDispatcher {
    pub fn new(verifier: Arc<dyn WebhookVerifier>) -> Self {
        Self {
            verifier,
            handler_delay: HANDLER_DELAY,
        }
    }

    /// Skip the stand-in delay (tests).
    pub fn without_delay(mut self) -> Self {
        self.handler_delay = Duration::ZERO;
        self
    }

    /// Whether a signing secret has been configured.
    pub fn secret_configured(&self) -> bool {
        self.verifier.is_configured()
    }

    /// Verify a signature and decode the event envelope.
    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookEvent, WebhookVerifyError> {
        self.verifier.verify_and_decode(payload, signature_header)
    }

    /// Boolean signature check: false on any failure, never an error.
    pub fn verify_signature(&self, payload: &[u8], signature_header: &str) -> bool {
        match self.verifier.verify_and_decode(payload, signature_header) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %err, "Webhook signature validation failed");
                false
            }
        }
    }

    /// Classify the event by kind and run its handler.
    ///
    /// Every recognized kind acknowledges with `success = true`; unknown
    /// kinds are acknowledged too, never rejected. The only failure mode is
    /// an embedded object that does not match what the type tag promises.
    pub async fn dispatch(&self, event: &WebhookEvent) -> ProcessingResult {
        tracing::info!(event_id = %event.id, event_type = %event.kind.tag(), "Processing webhook event");

        let result = match &event.kind {
            EventKind::PaymentSucceeded => self.on_payment_succeeded(event).await,
            EventKind::PaymentFailed => self.on_payment_failed(event).await,
            EventKind::PaymentRequiresAction => self.on_payment_requires_action(event).await,
            EventKind::SetupSucceeded => self.on_setup_succeeded(event).await,
            EventKind::SetupFailed => self.on_setup_failed(event).await,
            EventKind::CustomerCreated => self.on_customer_created(event).await,
            EventKind::CustomerUpdated => self.on_customer_updated(event).await,
            EventKind::CustomerDeleted => self.on_customer_deleted(event).await,
            EventKind::MethodAttached => self.on_method_attached(event).await,
            EventKind::MethodDetached => self.on_method_detached(event).await,
            EventKind::InvoicePaymentSucceeded => self.on_invoice_succeeded(event).await,
            EventKind::InvoicePaymentFailed => self.on_invoice_failed(event).await,
            EventKind::Unknown(tag) => self.on_unknown(event, tag),
        };

        if result.success {
            tracing::info!(event_id = %event.id, "Webhook event processed");
        } else {
            tracing::warn!(
                event_id = %event.id,
                error = result.error_details.as_deref().unwrap_or("-"),
                "Webhook event processing failed"
            );
        }

        result
    }

    async fn on_payment_succeeded(&self, event: &WebhookEvent) -> ProcessingResult {
        let EventObject::PaymentIntent {
            id,
            amount,
            currency,
            ..
        } = &event.object
        else {
            return mismatch(event);
        };

        tracing::info!(payment_intent_id = %id, amount, currency = %currency, "Payment succeeded");

        // A production system would record the payment, send a confirmation
        // email and fulfill the order here.
        tokio::time::sleep(self.handler_delay).await;

        ProcessingResult::ok(format!("Payment succeeded for {}", id))
    }

    async fn on_payment_failed(&self, event: &WebhookEvent) -> ProcessingResult {
        let EventObject::PaymentIntent {
            id,
            failure_message,
            ..
        } = &event.object
        else {
            return mismatch(event);
        };

        tracing::warn!(
            payment_intent_id = %id,
            reason = failure_message.as_deref().unwrap_or("-"),
            "Payment failed"
        );

        tokio::time::sleep(self.handler_delay).await;

        ProcessingResult::ok(format!("Payment failure processed for {}", id))
    }

    async fn on_payment_requires_action(&self, event: &WebhookEvent) -> ProcessingResult {
        let EventObject::PaymentIntent { id, .. } = &event.object else {
            return mismatch(event);
        };

        tracing::info!(payment_intent_id = %id, "Payment requires action");

        tokio::time::sleep(self.handler_delay).await;

        ProcessingResult::ok(format!("Payment requiring action processed for {}", id))
    }

    async fn on_setup_succeeded(&self, event: &WebhookEvent) -> ProcessingResult {
        let EventObject::SetupIntent { id, customer, .. } = &event.object else {
            return mismatch(event);
        };

        tracing::info!(
            setup_intent_id = %id,
            customer_id = customer.as_deref().unwrap_or("-"),
            "Setup intent succeeded"
        );

        tokio::time::sleep(self.handler_delay).await;

        ProcessingResult::ok(format!("Setup intent succeeded for {}", id))
    }

    async fn on_setup_failed(&self, event: &WebhookEvent) -> ProcessingResult {
        let EventObject::SetupIntent { id, .. } = &event.object else {
            return mismatch(event);
        };

        tracing::warn!(setup_intent_id = %id, "Setup intent failed");

        tokio::time::sleep(self.handler_delay).await;

        ProcessingResult::ok(format!("Setup intent failure processed for {}", id))
    }

    async fn on_customer_created(&self, event: &WebhookEvent) -> ProcessingResult {
        let EventObject::Customer { id, email, .. } = &event.object else {
            return mismatch(event);
        };

        tracing::info!(
            customer_id = %id,
            email = email.as_deref().unwrap_or("-"),
            "Customer created"
        );

        tokio::time::sleep(self.handler_delay).await;

        ProcessingResult::ok(format!("Customer creation processed for {}", id))
    }

    async fn on_customer_updated(&self, event: &WebhookEvent) -> ProcessingResult {
        let EventObject::Customer { id, .. } = &event.object else {
            return mismatch(event);
        };

        tracing::info!(customer_id = %id, "Customer updated");

        tokio::time::sleep(self.handler_delay).await;

        ProcessingResult::ok(format!("Customer update processed for {}", id))
    }

    async fn on_customer_deleted(&self, event: &WebhookEvent) -> ProcessingResult {
        let EventObject::Customer { id, .. } = &event.object else {
            return mismatch(event);
        };

        tracing::info!(customer_id = %id, "Customer deleted");

        tokio::time::sleep(self.handler_delay).await;

        ProcessingResult::ok(format!("Customer deletion processed for {}", id))
    }

    async fn on_method_attached(&self, event: &WebhookEvent) -> ProcessingResult {
        let EventObject::PaymentMethod { id, customer, .. } = &event.object else {
            return mismatch(event);
        };

        tracing::info!(
            payment_method_id = %id,
            customer_id = customer.as_deref().unwrap_or("-"),
            "Payment method attached"
        );

        tokio::time::sleep(self.handler_delay).await;

        ProcessingResult::ok(format!("Payment method attachment processed for {}", id))
    }

    async fn on_method_detached(&self, event: &WebhookEvent) -> ProcessingResult {
        let EventObject::PaymentMethod { id, .. } = &event.object else {
            return mismatch(event);
        };

        tracing::info!(payment_method_id = %id, "Payment method detached");

        tokio::time::sleep(self.handler_delay).await;

        ProcessingResult::ok(format!("Payment method detachment processed for {}", id))
    }

    async fn on_invoice_succeeded(&self, event: &WebhookEvent) -> ProcessingResult {
        let EventObject::Invoice { id, .. } = &event.object else {
            return mismatch(event);
        };

        tracing::info!(invoice_id = %id, "Invoice payment succeeded");

        tokio::time::sleep(self.handler_delay).await;

        ProcessingResult::ok(format!("Invoice payment success processed for {}", id))
    }

    async fn on_invoice_failed(&self, event: &WebhookEvent) -> ProcessingResult {
        let EventObject::Invoice { id, .. } = &event.object else {
            return mismatch(event);
        };

        tracing::warn!(invoice_id = %id, "Invoice payment failed");

        tokio::time::sleep(self.handler_delay).await;

        ProcessingResult::ok(format!("Invoice payment failure processed for {}", id))
    }

    fn on_unknown(&self, _event: &WebhookEvent, tag: &str) -> ProcessingResult {
        tracing::info!(event_type = %tag, "Received unknown webhook event type");
        ProcessingResult::ok(format!("Unknown event type {} logged", tag))
    }
}

fn mismatch(event: &WebhookEvent) -> ProcessingResult {
    ProcessingResult::failed(
        "Webhook processing failed",
        format!(
            "event {} of type {} carried an object that does not match its type tag",
            event.id,
            event.kind.tag()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RECOGNIZED_EVENT_TYPES;

    struct NullVerifier;

    impl WebhookVerifier for NullVerifier {
        fn is_configured(&self) -> bool {
            false
        }

        fn verify_and_decode(
            &self,
            _payload: &[u8],
            _signature_header: &str,
        ) -> Result<WebhookEvent, WebhookVerifyError> {
            Err(WebhookVerifyError::SecretNotConfigured)
        }
    }

    fn dispatcher() -> WebhookDispatcher {
        WebhookDispatcher::new(Arc::new(NullVerifier)).without_delay()
    }

    fn object_for(kind: &EventKind) -> EventObject {
        match kind {
            EventKind::PaymentSucceeded
            | EventKind::PaymentFailed
            | EventKind::PaymentRequiresAction => EventObject::PaymentIntent {
                id: "pi_100".to_string(),
                customer: Some("cus_1".to_string()),
                amount: 5000,
                currency: "usd".to_string(),
                status: "succeeded".to_string(),
                failure_message: None,
            },
            EventKind::SetupSucceeded | EventKind::SetupFailed => EventObject::SetupIntent {
                id: "seti_100".to_string(),
                customer: Some("cus_1".to_string()),
                status: "succeeded".to_string(),
            },
            EventKind::CustomerCreated
            | EventKind::CustomerUpdated
            | EventKind::CustomerDeleted => EventObject::Customer {
                id: "cus_100".to_string(),
                email: Some("ada@example.com".to_string()),
                name: Some("Ada".to_string()),
            },
            EventKind::MethodAttached | EventKind::MethodDetached => EventObject::PaymentMethod {
                id: "pm_100".to_string(),
                customer: Some("cus_1".to_string()),
                method_type: "card".to_string(),
            },
            EventKind::InvoicePaymentSucceeded | EventKind::InvoicePaymentFailed => {
                EventObject::Invoice {
                    id: "in_100".to_string(),
                    customer: Some("cus_1".to_string()),
                    amount_paid: 5000,
                    currency: "usd".to_string(),
                    status: "paid".to_string(),
                }
            }
            EventKind::Unknown(_) => {
                EventObject::Unrecognized(serde_json::json!({"id": "obj_100"}))
            }
        }
    }

    fn event(kind: EventKind) -> WebhookEvent {
        WebhookEvent {
            id: "evt_1".to_string(),
            object: object_for(&kind),
            kind,
            created: 1_704_067_200,
            live_mode: false,
        }
    }

    #[tokio::test]
    async fn every_recognized_kind_acknowledges_with_object_id() {
        let dispatcher = dispatcher();

        for tag in RECOGNIZED_EVENT_TYPES {
            let kind = EventKind::from_tag(tag);
            let event = event(kind);
            let expected_id = event.object.id().unwrap().to_string();

            let result = dispatcher.dispatch(&event).await;

            assert!(result.success, "kind {} did not acknowledge", tag);
            assert!(
                result.message.contains(&expected_id),
                "kind {} message '{}' missing object id",
                tag,
                result.message
            );
        }
    }

    #[tokio::test]
    async fn unknown_kind_is_acknowledged_and_named() {
        let dispatcher = dispatcher();
        let result = dispatcher
            .dispatch(&event(EventKind::Unknown("charge.refunded".to_string())))
            .await;

        assert!(result.success);
        assert!(result.message.contains("charge.refunded"));
    }

    #[tokio::test]
    async fn mismatched_object_reports_failure() {
        let dispatcher = dispatcher();
        let event = WebhookEvent {
            id: "evt_bad".to_string(),
            kind: EventKind::PaymentSucceeded,
            created: 1_704_067_200,
            live_mode: false,
            object: EventObject::Unrecognized(serde_json::json!({"foo": "bar"})),
        };

        let result = dispatcher.dispatch(&event).await;

        assert!(!result.success);
        assert!(result.error_details.is_some());
    }

    #[tokio::test]
    async fn verify_signature_is_false_without_secret() {
        let dispatcher = dispatcher();
        assert!(!dispatcher.verify_signature(b"{}", "t=1,v1=00"));
        assert!(!dispatcher.secret_configured());
    }
}
