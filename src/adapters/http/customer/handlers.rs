//! Handlers for the customer endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::dto::{CustomerProfileResponse, CustomerRequest, SavedMethodResponse, SetupIntentResponse};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;

/// POST /api/customers - find-or-create by email.
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let registration = request.into_registration()?;
    let profile = state.customers.find_or_create(&registration).await?;
    Ok(Json(CustomerProfileResponse::from(profile)))
}

/// GET /api/customers/:id - profile with saved methods.
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.customers.profile_with_methods(&customer_id).await?;
    Ok(Json(CustomerProfileResponse::from(profile)))
}

/// GET /api/customers/by-email/:email
pub async fn get_customer_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.customers.profile_by_email(&email).await?;
    Ok(Json(CustomerProfileResponse::from(profile)))
}

/// PUT /api/customers/:id - overwrite contact details.
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(request): Json<CustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let registration = request.into_registration()?;
    let profile = state.customers.update(&customer_id, &registration).await?;
    Ok(Json(CustomerProfileResponse::from(profile)))
}

/// GET /api/customers/:id/payment-methods
pub async fn list_payment_methods(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let methods = state.customers.saved_methods(&customer_id).await?;
    let methods: Vec<SavedMethodResponse> = methods.into_iter().map(Into::into).collect();
    Ok(Json(methods))
}

/// POST /api/customers/:id/setup-intent
pub async fn create_setup_intent(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let secret = state.customers.create_setup_intent(&customer_id).await?;
    Ok(Json(SetupIntentResponse::from(secret)))
}

/// DELETE /api/customers/payment-methods/:pm_id
pub async fn detach_payment_method(
    State(state): State<AppState>,
    Path(payment_method_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.customers.detach_method(&payment_method_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
