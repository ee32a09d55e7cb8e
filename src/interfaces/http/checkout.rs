use super::AppState;
use crate::domain::checkout::CheckoutRequest;
use crate::domain::order::{DeliveryMethod, OrderLine};
use crate::error::{AppError, Result};
use axum::{Form, Json, extract::State, extract::rejection::FormRejection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

const INVALID_FORM: &str = "Invalid form data provided. Please check your inputs.";

/// The storefront checkout form. `cartItems` arrives as a JSON-encoded string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    pub cart_items: String,
    pub total: Decimal,
    pub delivery_method: DeliveryMethod,
    #[serde(default)]
    pub channel: Option<String>,
}

impl CheckoutForm {
    fn into_request(self) -> Result<CheckoutRequest> {
        let items: Vec<OrderLine> = serde_json::from_str(&self.cart_items)
            .map_err(|_| AppError::ValidationError("Invalid cart data.".to_string()))?;
        Ok(CheckoutRequest {
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address.filter(|a| !a.trim().is_empty()),
            items,
            total: self.total,
            delivery_method: self.delivery_method,
            channel: self.channel.filter(|c| !c.trim().is_empty()),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
}

pub async fn checkout_handler(
    State(state): State<AppState>,
    form: std::result::Result<Form<CheckoutForm>, FormRejection>,
) -> Result<Json<CheckoutResponse>> {
    let Form(form) = form.map_err(|rejection| {
        debug!(%rejection, "Checkout form rejected");
        AppError::ValidationError(INVALID_FORM.to_string())
    })?;
    let session = state.services.checkout.checkout(form.into_request()?).await?;
    Ok(Json(CheckoutResponse {
        error: false,
        message: "Redirecting to payment...".to_string(),
        checkout_url: Some(session.checkout_url),
    }))
}
