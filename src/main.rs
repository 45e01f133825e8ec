//! Service entrypoint: configuration, wiring and the axum server loop.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use payportal::adapters::http::{api_router, AppState};
use payportal::adapters::stripe::{StripeGateway, StripeWebhookVerifier};
use payportal::application::{CustomerOrchestrator, PaymentOrchestrator, WebhookDispatcher};
use payportal::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        stripe_test_mode = config.stripe.is_test_mode(),
        webhook_secret_configured = config.stripe.has_webhook_secret(),
        "Starting payportal"
    );

    let gateway = Arc::new(StripeGateway::new(config.stripe.clone()));
    let verifier = Arc::new(StripeWebhookVerifier::new(
        config.stripe.webhook_secret.clone(),
    ));

    let state = AppState {
        customers: Arc::new(CustomerOrchestrator::new(gateway.clone())),
        payments: Arc::new(PaymentOrchestrator::new(
            gateway,
            config.stripe.return_url.clone(),
        )),
        dispatcher: Arc::new(WebhookDispatcher::new(verifier)),
        stripe: config.stripe.clone(),
    };

    let cors = cors_layer(&config.server.cors_origins_list());

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
