//! JSON shapes for the payment endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::customer::dto::CustomerRequest;
use crate::domain::{
    IntentStatus, MinorUnits, PaymentReceipt, PaymentRequest, ServiceError, SimpleChargeRequest,
    DEFAULT_CURRENCY, SUPPORTED_CURRENCIES,
};
use crate::ports::GatewayPaymentMethod;

fn validated_currency(currency: Option<String>) -> Result<String, ServiceError> {
    let currency = currency
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
        .to_lowercase();

    if !SUPPORTED_CURRENCIES.contains(&currency.as_str()) {
        return Err(ServiceError::validation(
            "currency",
            format!("unsupported currency '{}'", currency),
        ));
    }

    Ok(currency)
}

/// Body for POST /api/payments/intent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIntentRequest {
    /// Amount in minor units (cents).
    pub amount: i64,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub save_payment_method: bool,

    /// Inline customer details, used when no id is given.
    #[serde(default)]
    pub customer: Option<CustomerRequest>,

    /// Existing gateway customer id; wins over inline details.
    #[serde(default)]
    pub customer_id: Option<String>,
}

impl CreateIntentRequest {
    pub fn into_payment_request(self) -> Result<PaymentRequest, ServiceError> {
        let customer = self
            .customer
            .map(CustomerRequest::into_registration)
            .transpose()?;

        Ok(PaymentRequest {
            amount: MinorUnits::new(self.amount)?,
            currency: validated_currency(self.currency)?,
            save_payment_method: self.save_payment_method,
            customer,
            existing_customer_id: self.customer_id,
        })
    }
}

/// Body for POST /api/payments/intent/saved-method.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedMethodChargeRequest {
    pub customer_id: String,
    pub payment_method_id: String,
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
}

impl SavedMethodChargeRequest {
    pub fn validated(self) -> Result<(String, String, MinorUnits, String), ServiceError> {
        if self.customer_id.is_empty() {
            return Err(ServiceError::validation("customer_id", "must not be empty"));
        }
        if self.payment_method_id.is_empty() {
            return Err(ServiceError::validation(
                "payment_method_id",
                "must not be empty",
            ));
        }

        Ok((
            self.customer_id,
            self.payment_method_id,
            MinorUnits::new(self.amount)?,
            validated_currency(self.currency)?,
        ))
    }
}

/// Body for POST /api/payments/intent/simple.
#[derive(Debug, Clone, Deserialize)]
pub struct SimpleIntentRequest {
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub payment_method_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub save_payment_method: bool,
}

impl SimpleIntentRequest {
    pub fn into_charge_request(self) -> Result<SimpleChargeRequest, ServiceError> {
        Ok(SimpleChargeRequest {
            amount: MinorUnits::new(self.amount)?,
            currency: validated_currency(self.currency)?,
            customer_id: self.customer_id,
            payment_method_id: self.payment_method_id,
            description: self.description,
            save_payment_method: self.save_payment_method,
        })
    }
}

/// The client secret and ids a browser needs to finish a payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceiptResponse {
    pub client_secret: String,
    pub customer_id: Option<String>,
    pub payment_intent_id: String,
}

impl From<PaymentReceipt> for PaymentReceiptResponse {
    fn from(receipt: PaymentReceipt) -> Self {
        Self {
            client_secret: receipt.client_secret,
            customer_id: receipt.customer_id,
            payment_intent_id: receipt.payment_intent_id,
        }
    }
}

/// Status view of a payment intent.
#[derive(Debug, Clone, Serialize)]
pub struct IntentStatusResponse {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
}

impl From<IntentStatus> for IntentStatusResponse {
    fn from(status: IntentStatus) -> Self {
        Self {
            id: status.id,
            status: status.status,
            amount: status.amount,
            currency: status.currency,
        }
    }
}

/// Detailed payment method view, card and billing included.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodDetailResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub method_type: String,
    pub customer_id: Option<String>,
    pub card: Option<CardResponse>,
    pub billing: Option<BillingResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardResponse {
    pub brand: String,
    pub last4: String,
    pub exp_month: i64,
    pub exp_year: i64,
    pub funding: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillingResponse {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<GatewayPaymentMethod> for PaymentMethodDetailResponse {
    fn from(method: GatewayPaymentMethod) -> Self {
        Self {
            id: method.id,
            method_type: method.method_type,
            customer_id: method.customer,
            card: method.card.map(|card| CardResponse {
                brand: card.brand,
                last4: card.last4,
                exp_month: card.exp_month,
                exp_year: card.exp_year,
                funding: card.funding,
                country: card.country,
            }),
            billing: method.billing.map(|billing| BillingResponse {
                name: billing.name,
                email: billing.email,
                phone: billing.phone,
            }),
        }
    }
}
