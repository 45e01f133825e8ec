//! Integration tests for the HTTP API surface.
//!
//! These tests mount the full router over a mock gateway and verify:
//! 1. Customer registration and profile retrieval round-trip
//! 2. Payment intent creation, confirmation, and status lookup
//! 3. Error taxonomy mapping (validation 400, not found 404, provider 400)
//! 4. Webhook signature enforcement (missing header, bad signature, valid event)
//! 5. Config endpoints reflect the Stripe settings they were built from

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{json, Value};
use sha2::Sha256;
use tower::ServiceExt;

use payportal::adapters::http::{api_router, AppState};
use payportal::adapters::stripe::{MockGateway, StripeWebhookVerifier};
use payportal::application::{CustomerOrchestrator, PaymentOrchestrator, WebhookDispatcher};
use payportal::config::StripeSettings;

const WEBHOOK_SECRET: &str = "whsec_integration_secret";
const RETURN_URL: &str = "http://localhost:3000/payment-complete";

fn stripe_settings(publishable_key: &str) -> StripeSettings {
    StripeSettings {
        secret_key: SecretString::new("sk_test_integration".into()),
        publishable_key: publishable_key.to_string(),
        webhook_secret: Some(SecretString::new(WEBHOOK_SECRET.into())),
        api_base_url: "https://api.stripe.com".to_string(),
        return_url: RETURN_URL.to_string(),
    }
}

fn test_app(gateway: Arc<MockGateway>) -> Router {
    test_app_with_settings(gateway, stripe_settings("pk_test_integration"))
}

fn test_app_with_settings(gateway: Arc<MockGateway>, stripe: StripeSettings) -> Router {
    let verifier = Arc::new(StripeWebhookVerifier::new(stripe.webhook_secret.clone()));
    let state = AppState {
        customers: Arc::new(CustomerOrchestrator::new(gateway.clone())),
        payments: Arc::new(PaymentOrchestrator::new(gateway, RETURN_URL)),
        dispatcher: Arc::new(WebhookDispatcher::new(verifier).without_delay()),
        stripe,
    };
    Router::new().nest("/api", api_router()).with_state(state)
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send_empty(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn sign_payload(payload: &str, timestamp: i64) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn webhook_event(event_type: &str, object: Value) -> String {
    json!({
        "id": "evt_integration_1",
        "type": event_type,
        "created": now(),
        "livemode": false,
        "data": { "object": object }
    })
    .to_string()
}

async fn send_webhook(app: &Router, payload: &str, signature: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhooks/stripe")
        .header("content-type", "application/json");
    if let Some(sig) = signature {
        builder = builder.header("Stripe-Signature", sig);
    }
    let request = builder.body(Body::from(payload.to_string())).unwrap();
    send(app, request).await
}

// ════════════════════════════════════════════════════════════════════
// Customer endpoints
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn register_customer_then_fetch_profile() {
    let gateway = Arc::new(MockGateway::new());
    let app = test_app(gateway);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/customers",
        json!({ "name": "Ada Lovelace", "email": "ada@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ada@example.com");
    let customer_id = body["customer_id"].as_str().unwrap().to_string();

    let (status, body) = send_empty(&app, "GET", &format!("/api/customers/{}", customer_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada Lovelace");
    assert!(body["saved_payment_methods"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn registering_same_email_reuses_customer() {
    let gateway = Arc::new(MockGateway::new());
    let app = test_app(gateway.clone());

    let payload = json!({ "name": "Grace Hopper", "email": "grace@example.com" });
    let (_, first) = send_json(&app, "POST", "/api/customers", payload.clone()).await;
    let (_, second) = send_json(&app, "POST", "/api/customers", payload).await;

    assert_eq!(first["customer_id"], second["customer_id"]);
    assert_eq!(gateway.customer_count(), 1);
}

#[tokio::test]
async fn lookup_by_email_returns_saved_cards() {
    let gateway = Arc::new(MockGateway::new());
    let customer_id = gateway.seed_customer("card.holder@example.com", "Card Holder");
    gateway.attach_card(&customer_id, "visa", "4242");
    let app = test_app(gateway);

    let (status, body) =
        send_empty(&app, "GET", "/api/customers/by-email/card.holder@example.com").await;
    assert_eq!(status, StatusCode::OK);
    let methods = body["saved_payment_methods"].as_array().unwrap();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0]["brand"], "visa");
    assert_eq!(methods[0]["last4"], "4242");
}

#[tokio::test]
async fn unknown_customer_returns_not_found() {
    let app = test_app(Arc::new(MockGateway::new()));

    let (status, body) = send_empty(&app, "GET", "/api/customers/cus_missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "customer not found");
}

#[tokio::test]
async fn invalid_email_rejected_with_field_name() {
    let app = test_app(Arc::new(MockGateway::new()));

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/customers",
        json!({ "name": "No Address", "email": "not-an-email" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("email:"));
}

#[tokio::test]
async fn setup_intent_issued_for_existing_customer() {
    let gateway = Arc::new(MockGateway::new());
    let customer_id = gateway.seed_customer("setup@example.com", "Setup User");
    let app = test_app(gateway);

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/customers/{}/setup-intent", customer_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["client_secret"].as_str().unwrap().contains("_secret_"));
    assert!(body["setup_intent_id"].as_str().unwrap().starts_with("seti_"));
}

// ════════════════════════════════════════════════════════════════════
// Payment endpoints
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn payment_intent_created_for_new_customer() {
    let gateway = Arc::new(MockGateway::new());
    let app = test_app(gateway.clone());

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/payments/intent",
        json!({
            "amount": 2500,
            "currency": "aud",
            "save_payment_method": true,
            "customer": { "name": "Payer One", "email": "payer@example.com" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["client_secret"].as_str().unwrap().contains("_secret_"));

    let intent_id = body["payment_intent_id"].as_str().unwrap();
    let params = gateway.intent(intent_id).unwrap();
    assert_eq!(params.amount, 2500);
    assert_eq!(params.currency, "aud");
    assert!(params.save_for_future_use);
}

#[tokio::test]
async fn zero_amount_rejected() {
    let app = test_app(Arc::new(MockGateway::new()));

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/payments/intent/simple",
        json!({ "amount": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("amount:"));
}

#[tokio::test]
async fn unsupported_currency_rejected() {
    let app = test_app(Arc::new(MockGateway::new()));

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/payments/intent/simple",
        json!({ "amount": 1000, "currency": "xyz" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("currency:"));
}

#[tokio::test]
async fn saved_method_charge_confirms_immediately() {
    let gateway = Arc::new(MockGateway::new());
    let customer_id = gateway.seed_customer("repeat@example.com", "Repeat Buyer");
    let method_id = gateway.attach_card(&customer_id, "mastercard", "4444");
    let app = test_app(gateway.clone());

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/payments/intent/saved-method",
        json!({
            "customer_id": customer_id,
            "payment_method_id": method_id,
            "amount": 5000
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let intent_id = body["payment_intent_id"].as_str().unwrap();
    let params = gateway.intent(intent_id).unwrap();
    assert!(params.confirm);
    assert!(params.manual_confirmation);
    assert_eq!(params.return_url.as_deref(), Some(RETURN_URL));
}

#[tokio::test]
async fn intent_status_reflects_confirmation() {
    let gateway = Arc::new(MockGateway::new());
    let app = test_app(gateway);

    let (_, created) = send_json(
        &app,
        "POST",
        "/api/payments/intent/simple",
        json!({ "amount": 1200 }),
    )
    .await;
    let intent_id = created["payment_intent_id"].as_str().unwrap().to_string();

    let (status, body) =
        send_empty(&app, "GET", &format!("/api/payments/intent/{}", intent_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "requires_payment_method");

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/payments/intent/{}/confirm", intent_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send_empty(&app, "GET", &format!("/api/payments/intent/{}", intent_id)).await;
    assert_eq!(body["status"], "succeeded");
}

#[tokio::test]
async fn missing_intent_returns_not_found() {
    let app = test_app(Arc::new(MockGateway::new()));

    let (status, body) = send_empty(&app, "GET", "/api/payments/intent/pi_missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "payment intent not found");
}

#[tokio::test]
async fn detaching_unknown_method_surfaces_provider_message() {
    let app = test_app(Arc::new(MockGateway::new()));

    let (status, body) = send_empty(&app, "DELETE", "/api/payments/methods/pm_missing").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("pm_missing"));
}

#[tokio::test]
async fn detaching_attached_method_returns_no_content() {
    let gateway = Arc::new(MockGateway::new());
    let customer_id = gateway.seed_customer("detach@example.com", "Detach User");
    let method_id = gateway.attach_card(&customer_id, "visa", "1111");
    let app = test_app(gateway);

    let (status, _) =
        send_empty(&app, "DELETE", &format!("/api/payments/methods/{}", method_id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// ════════════════════════════════════════════════════════════════════
// Webhook endpoints
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn webhook_without_signature_header_is_rejected() {
    let app = test_app(Arc::new(MockGateway::new()));
    let payload = webhook_event("payment_intent.succeeded", json!({ "id": "pi_1" }));

    let (status, body) = send_webhook(&app, &payload, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing Stripe-Signature header");
}

#[tokio::test]
async fn webhook_with_wrong_signature_is_unauthorized() {
    let app = test_app(Arc::new(MockGateway::new()));
    let payload = webhook_event("payment_intent.succeeded", json!({ "id": "pi_1" }));
    let signature = sign_payload("tampered body", now());

    let (status, body) = send_webhook(&app, &payload, Some(&signature)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid webhook signature");
}

#[tokio::test]
async fn webhook_with_stale_timestamp_is_unauthorized() {
    let app = test_app(Arc::new(MockGateway::new()));
    let payload = webhook_event("payment_intent.succeeded", json!({ "id": "pi_1" }));
    let signature = sign_payload(&payload, now() - 600);

    let (status, _) = send_webhook(&app, &payload, Some(&signature)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signed_payment_succeeded_event_is_acknowledged() {
    let app = test_app(Arc::new(MockGateway::new()));
    let payload = webhook_event(
        "payment_intent.succeeded",
        json!({
            "id": "pi_hook_1",
            "amount": 2500,
            "currency": "usd",
            "status": "succeeded"
        }),
    );
    let signature = sign_payload(&payload, now());

    let (status, body) = send_webhook(&app, &payload, Some(&signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event_id"], "evt_integration_1");
    assert!(body["message"].as_str().unwrap().contains("pi_hook_1"));
}

#[tokio::test]
async fn signed_unknown_event_type_is_acknowledged() {
    let app = test_app(Arc::new(MockGateway::new()));
    let payload = webhook_event("balance.available", json!({ "id": "bal_1" }));
    let signature = sign_payload(&payload, now());

    let (status, body) = send_webhook(&app, &payload, Some(&signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("balance.available"));
}

#[tokio::test]
async fn signed_garbage_payload_is_bad_request() {
    let app = test_app(Arc::new(MockGateway::new()));
    let payload = "not json at all";
    let signature = sign_payload(payload, now());

    let (status, _) = send_webhook(&app, payload, Some(&signature)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_status_lists_supported_events() {
    let app = test_app(Arc::new(MockGateway::new()));

    let (status, body) = send_empty(&app, "GET", "/api/webhooks/stripe/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["configured"], true);
    let events = body["supported_events"].as_array().unwrap();
    assert!(events.iter().any(|e| e == "payment_intent.succeeded"));
    assert!(events.iter().any(|e| e == "invoice.payment_failed"));
}

// ════════════════════════════════════════════════════════════════════
// Config endpoints
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn stripe_config_exposes_publishable_key_and_environment() {
    let app = test_app(Arc::new(MockGateway::new()));

    let (status, body) = send_empty(&app, "GET", "/api/config/stripe").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["publishable_key"], "pk_test_integration");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn stripe_config_fails_when_publishable_key_missing() {
    let app = test_app_with_settings(Arc::new(MockGateway::new()), stripe_settings(""));

    let (status, body) = send_empty(&app, "GET", "/api/config/stripe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("publishable key"));
}

#[tokio::test]
async fn app_config_reports_webhook_feature() {
    let app = test_app(Arc::new(MockGateway::new()));

    let (status, body) = send_empty(&app, "GET", "/api/config/app").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["features"]["webhooks"], true);
    assert!(body["supported_currencies"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == "usd"));
}
