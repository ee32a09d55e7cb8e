use crate::domain::contact::normalize_phone;
use crate::domain::payment::{Gateway, PaymentOutcome, PaymentRequest, WebhookOutcome};
use crate::domain::ports::{PaymentGateway, SharedSettingsStore, WebhookReceiver};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

pub const DEFAULT_API_URL: &str = "https://api.hubtel.com/v1/merchantaccount/checkout/initiate";

const NOT_CONFIGURED: &str = "Hubtel API credentials or Merchant Account Number are not configured.";
const UNREACHABLE: &str = "An unexpected error occurred while contacting Hubtel.";
const SUCCESS_CODES: [&str; 2] = ["0000", "000"];

/// Where Hubtel is reached and where it sends the customer and the callback afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct HubtelEndpoints {
    pub api_url: String,
    pub callback_url: String,
    pub return_url: String,
    pub cancellation_url: String,
}

/// Hosted checkout and callback decoding for Hubtel.
///
/// Credentials come from the settings document on every call.
pub struct HubtelGateway {
    http: Client,
    settings: SharedSettingsStore,
    endpoints: HubtelEndpoints,
}

impl HubtelGateway {
    pub fn new(http: Client, settings: SharedSettingsStore, endpoints: HubtelEndpoints) -> Self {
        Self {
            http,
            settings,
            endpoints,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutPayload<'a> {
    #[serde(with = "rust_decimal::serde::float")]
    total_amount: Decimal,
    description: &'a str,
    callback_url: &'a str,
    return_url: &'a str,
    cancellation_url: &'a str,
    merchant_account_number: &'a str,
    client_reference: &'a str,
    customer_name: &'a str,
    customer_msisdn: String,
    channel: &'a str,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct CheckoutResponse {
    status: Option<String>,
    message: Option<String>,
    data: Option<CheckoutData>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct CheckoutData {
    checkout_url: Option<String>,
}

/// Reads the redirect URL out of a checkout-initiate response.
pub(crate) fn checkout_url_from_response(status: StatusCode, body: &str) -> Result<String> {
    let parsed: CheckoutResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!(%status, error = %e, "Unreadable Hubtel response");
            return Err(AppError::GatewayError(format!(
                "Failed to initiate payment. Reason: HTTP {status}"
            )));
        }
    };

    let accepted = status.is_success() && parsed.status.as_deref() == Some("Success");
    if !accepted {
        let reason = parsed
            .message
            .unwrap_or_else(|| "Unknown Hubtel error".to_string());
        warn!(%status, %reason, "Hubtel rejected checkout");
        return Err(AppError::GatewayError(format!(
            "Failed to initiate payment. Reason: {reason}"
        )));
    }

    parsed
        .data
        .and_then(|d| d.checkout_url)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            AppError::GatewayError("Checkout URL not found in the response from Hubtel.".to_string())
        })
}

#[async_trait]
impl PaymentGateway for HubtelGateway {
    fn gateway(&self) -> Gateway {
        Gateway::Hubtel
    }

    fn requires_channel(&self) -> bool {
        true
    }

    async fn initiate(&self, request: &PaymentRequest) -> Result<String> {
        let settings = self.settings.get_settings().await?;
        if !settings.hubtel_configured() {
            error!("Hubtel credentials missing from settings");
            return Err(AppError::GatewayConfigError(NOT_CONFIGURED.to_string()));
        }

        let payload = CheckoutPayload {
            total_amount: request.amount,
            description: &request.description,
            callback_url: &self.endpoints.callback_url,
            return_url: &self.endpoints.return_url,
            cancellation_url: &self.endpoints.cancellation_url,
            merchant_account_number: &settings.merchant_account_number,
            client_reference: &request.client_reference,
            customer_name: &request.customer_name,
            customer_msisdn: normalize_phone(&request.mobile_number),
            channel: request.channel.as_deref().unwrap_or_default(),
        };
        debug!(
            reference = %request.client_reference,
            msisdn = %payload.customer_msisdn,
            channel = payload.channel,
            "Sending Hubtel checkout request"
        );

        let response = self
            .http
            .post(&self.endpoints.api_url)
            .basic_auth(&settings.hubtel_client_id, Some(&settings.hubtel_client_secret))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Hubtel request failed");
                AppError::GatewayError(UNREACHABLE.to_string())
            })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Hubtel response body unreadable");
            AppError::GatewayError(UNREACHABLE.to_string())
        })?;

        let url = checkout_url_from_response(status, &body)?;
        info!(reference = %request.client_reference, "Hubtel checkout created");
        Ok(url)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Callback {
    response_code: Option<String>,
    status: Option<String>,
    data: Option<CallbackData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CallbackData {
    client_reference: Option<String>,
    checkout_id: Option<String>,
    sales_invoice_id: Option<String>,
}

#[async_trait]
impl WebhookReceiver for HubtelGateway {
    fn gateway(&self) -> Gateway {
        Gateway::Hubtel
    }

    /// Hubtel callbacks carry no signature; they are trusted by shape.
    async fn verify(&self, _body: &[u8], _signature: Option<&str>) -> Result<()> {
        Ok(())
    }

    fn extract_outcome(&self, body: &[u8]) -> Result<Option<WebhookOutcome>> {
        let callback: Callback = serde_json::from_slice(body)
            .map_err(|e| AppError::MalformedPayload(format!("Invalid Hubtel callback: {e}")))?;

        let succeeded = callback
            .response_code
            .as_deref()
            .is_some_and(|code| SUCCESS_CODES.contains(&code))
            && callback.status.as_deref() == Some("Success")
            && callback.data.is_some();

        let (reference, transaction_id) = match callback.data {
            Some(data) => (
                data.client_reference.filter(|r| !r.is_empty()),
                data.checkout_id.or(data.sales_invoice_id),
            ),
            None => (None, None),
        };

        if succeeded && reference.is_none() {
            return Err(AppError::MalformedPayload(
                "ClientReference missing from successful Hubtel callback".to_string(),
            ));
        }

        let outcome = if succeeded {
            PaymentOutcome::Succeeded
        } else {
            PaymentOutcome::Failed
        };
        Ok(Some(WebhookOutcome {
            outcome,
            reference,
            transaction_id,
        }))
    }
}
