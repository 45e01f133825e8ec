//! Handlers for the payment endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::dto::{
    CreateIntentRequest, IntentStatusResponse, PaymentMethodDetailResponse,
    PaymentReceiptResponse, SavedMethodChargeRequest, SimpleIntentRequest,
};
use crate::adapters::http::customer::dto::SavedMethodResponse;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;

/// POST /api/payments/intent - full payment flow.
pub async fn create_intent(
    State(state): State<AppState>,
    Json(request): Json<CreateIntentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = request.into_payment_request()?;
    let receipt = state.payments.process_payment(&payment).await?;
    Ok(Json(PaymentReceiptResponse::from(receipt)))
}

/// POST /api/payments/intent/saved-method - charge a saved method.
pub async fn charge_saved_method(
    State(state): State<AppState>,
    Json(request): Json<SavedMethodChargeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (customer_id, payment_method_id, amount, currency) = request.validated()?;
    let receipt = state
        .payments
        .charge_saved_method(&customer_id, &payment_method_id, amount, &currency)
        .await?;
    Ok(Json(PaymentReceiptResponse::from(receipt)))
}

/// POST /api/payments/intent/simple - direct options passthrough.
pub async fn create_simple_intent(
    State(state): State<AppState>,
    Json(request): Json<SimpleIntentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let charge = request.into_charge_request()?;
    let receipt = state.payments.create_simple_intent(&charge).await?;
    Ok(Json(PaymentReceiptResponse::from(receipt)))
}

/// POST /api/payments/intent/:id/confirm
pub async fn confirm_intent(
    State(state): State<AppState>,
    Path(payment_intent_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.payments.confirm(&payment_intent_id).await?;
    Ok(Json(IntentStatusResponse::from(status)))
}

/// GET /api/payments/intent/:id
pub async fn get_intent(
    State(state): State<AppState>,
    Path(payment_intent_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.payments.get(&payment_intent_id).await?;
    Ok(Json(IntentStatusResponse::from(status)))
}

/// GET /api/payments/methods/:id - detailed card and billing view.
pub async fn get_payment_method(
    State(state): State<AppState>,
    Path(payment_method_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let method = state.payments.get_method(&payment_method_id).await?;
    Ok(Json(PaymentMethodDetailResponse::from(method)))
}

/// DELETE /api/payments/methods/:id
pub async fn detach_payment_method(
    State(state): State<AppState>,
    Path(payment_method_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.payments.detach_method(&payment_method_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/payments/saved-methods/:customer_id
pub async fn list_saved_methods(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let methods = state.customers.saved_methods(&customer_id).await?;
    let methods: Vec<SavedMethodResponse> = methods.into_iter().map(Into::into).collect();
    Ok(Json(methods))
}
