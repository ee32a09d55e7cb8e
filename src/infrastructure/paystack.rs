use crate::domain::contact::normalize_phone;
use crate::domain::payment::{Gateway, PaymentOutcome, PaymentRequest, WebhookOutcome};
use crate::domain::ports::{PaymentGateway, SharedSettingsStore, WebhookReceiver};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{Client, StatusCode};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha512;
use tracing::{debug, error, info, warn};

type HmacSha512 = Hmac<Sha512>;

pub const DEFAULT_API_URL: &str = "https://api.paystack.co";
pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

const UNREACHABLE: &str = "An unexpected error occurred while contacting Paystack.";

#[derive(Debug, Clone, PartialEq)]
pub struct PaystackEndpoints {
    /// Base URL; `/transaction/initialize` is appended.
    pub api_url: String,
    pub callback_url: String,
}

/// Hosted checkout and signed-webhook handling for Paystack.
pub struct PaystackGateway {
    http: Client,
    settings: SharedSettingsStore,
    endpoints: PaystackEndpoints,
}

impl PaystackGateway {
    pub fn new(http: Client, settings: SharedSettingsStore, endpoints: PaystackEndpoints) -> Self {
        Self {
            http,
            settings,
            endpoints,
        }
    }

    async fn secret_key(&self) -> Result<String> {
        let key = self.settings.get_settings().await?.paystack_secret_key;
        if key.is_empty() {
            return Err(AppError::GatewayConfigError(
                "Paystack Secret Key is not configured.".to_string(),
            ));
        }
        Ok(key)
    }
}

/// Hex HMAC-SHA512 of `body` keyed by the Paystack secret, as sent in `x-paystack-signature`.
pub fn signature(secret: &str, body: &[u8]) -> Result<String> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|_| AppError::InternalError("invalid HMAC key".into()))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Converts major units to pesewas/kobo. Half a pesewa rounds away from zero.
fn minor_units(amount: Decimal) -> Result<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| AppError::ValidationError(format!("Amount {amount} is out of range.")))
}

#[derive(Serialize)]
struct InitializePayload<'a> {
    email: &'a str,
    amount: i64,
    reference: &'a str,
    callback_url: &'a str,
    metadata: Metadata<'a>,
}

#[derive(Serialize)]
struct Metadata<'a> {
    customer_name: &'a str,
    phone: String,
    description: &'a str,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct InitializeResponse {
    status: bool,
    message: Option<String>,
    data: Option<InitializeData>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct InitializeData {
    authorization_url: Option<String>,
}

pub(crate) fn authorization_url_from_response(status: StatusCode, body: &str) -> Result<String> {
    let parsed: InitializeResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!(%status, error = %e, "Unreadable Paystack response");
            return Err(AppError::GatewayError(format!(
                "Failed to initiate payment. Reason: HTTP {status}"
            )));
        }
    };

    if !status.is_success() || !parsed.status {
        let reason = parsed
            .message
            .unwrap_or_else(|| "Unknown Paystack error".to_string());
        warn!(%status, %reason, "Paystack rejected transaction");
        return Err(AppError::GatewayError(format!(
            "Failed to initiate payment. Reason: {reason}"
        )));
    }

    parsed
        .data
        .and_then(|d| d.authorization_url)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            AppError::GatewayError(
                "Authorization URL not found in the response from Paystack.".to_string(),
            )
        })
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    fn gateway(&self) -> Gateway {
        Gateway::Paystack
    }

    fn requires_channel(&self) -> bool {
        false
    }

    async fn initiate(&self, request: &PaymentRequest) -> Result<String> {
        let secret = self.secret_key().await?;
        let payload = InitializePayload {
            email: &request.customer_email,
            amount: minor_units(request.amount)?,
            reference: &request.client_reference,
            callback_url: &self.endpoints.callback_url,
            metadata: Metadata {
                customer_name: &request.customer_name,
                phone: normalize_phone(&request.mobile_number),
                description: &request.description,
            },
        };
        debug!(
            reference = %request.client_reference,
            amount = payload.amount,
            "Sending Paystack initialize request"
        );

        let url = format!(
            "{}/transaction/initialize",
            self.endpoints.api_url.trim_end_matches('/')
        );
        let response = self
            .http
            .post(url)
            .bearer_auth(secret)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Paystack request failed");
                AppError::GatewayError(UNREACHABLE.to_string())
            })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Paystack response body unreadable");
            AppError::GatewayError(UNREACHABLE.to_string())
        })?;

        let url = authorization_url_from_response(status, &body)?;
        info!(reference = %request.client_reference, "Paystack transaction initialized");
        Ok(url)
    }
}

#[derive(Deserialize)]
struct Event {
    event: String,
    #[serde(default)]
    data: EventData,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct EventData {
    reference: Option<String>,
    status: Option<String>,
    id: Option<Value>,
}

fn id_to_string(id: Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl WebhookReceiver for PaystackGateway {
    fn gateway(&self) -> Gateway {
        Gateway::Paystack
    }

    async fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<()> {
        let secret = self.secret_key().await?;
        let provided = signature
            .and_then(|s| hex::decode(s.trim()).ok())
            .ok_or(AppError::Unauthorized)?;

        let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
            .map_err(|_| AppError::InternalError("invalid HMAC key".into()))?;
        mac.update(body);
        mac.verify_slice(&provided).map_err(|_| {
            warn!("Paystack webhook signature mismatch");
            AppError::Unauthorized
        })
    }

    fn extract_outcome(&self, body: &[u8]) -> Result<Option<WebhookOutcome>> {
        let event: Event = serde_json::from_slice(body)
            .map_err(|e| AppError::MalformedPayload(format!("Invalid Paystack event: {e}")))?;
        if event.event != "charge.success" {
            debug!(event = %event.event, "Ignoring Paystack event");
            return Ok(None);
        }

        let data = event.data;
        let outcome = if data.status.as_deref() == Some("success") {
            PaymentOutcome::Succeeded
        } else {
            PaymentOutcome::Failed
        };
        let reference = data.reference.filter(|r| !r.is_empty());
        if outcome == PaymentOutcome::Succeeded && reference.is_none() {
            return Err(AppError::MalformedPayload(
                "reference missing from successful Paystack charge".to_string(),
            ));
        }

        Ok(Some(WebhookOutcome {
            outcome,
            reference,
            transaction_id: data.id.and_then(id_to_string),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::SettingsStore;
    use crate::domain::settings::Settings;
    use crate::infrastructure::in_memory::InMemoryStore;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    const SECRET: &str = "sk_test_secret";

    fn gateway_with_secret(secret: &str) -> PaystackGateway {
        let store = InMemoryStore::with_settings(Settings {
            paystack_secret_key: secret.to_string(),
            ..Settings::default()
        });
        PaystackGateway::new(
            Client::new(),
            Arc::new(store),
            PaystackEndpoints {
                api_url: "http://127.0.0.1:9".to_string(),
                callback_url: "http://localhost:3000/order-confirmation".to_string(),
            },
        )
    }

    #[test]
    fn test_minor_units_round_half_pesewa_away_from_zero() {
        assert_eq!(minor_units(dec!(25.00)).unwrap(), 2500);
        assert_eq!(minor_units(dec!(12.345)).unwrap(), 1235);
        assert_eq!(minor_units(dec!(0.125)).unwrap(), 13);
        assert_eq!(minor_units(dec!(12.344)).unwrap(), 1234);
        assert_eq!(minor_units(dec!(0.5)).unwrap(), 50);
    }

    #[test]
    fn test_minor_units_out_of_range_is_error() {
        assert!(matches!(
            minor_units(Decimal::MAX),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_authorization_url_read_from_response() {
        let body = r#"{"status":true,"message":"ok","data":{"authorization_url":"https://checkout.paystack.com/x"}}"#;
        let url = authorization_url_from_response(StatusCode::OK, body).unwrap();
        assert_eq!(url, "https://checkout.paystack.com/x");
    }

    #[test]
    fn test_false_status_is_gateway_error() {
        let body = r#"{"status":false,"message":"Invalid key"}"#;
        let err = authorization_url_from_response(StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert_eq!(err.to_string(), "Failed to initiate payment. Reason: Invalid key");
    }

    #[tokio::test]
    async fn test_valid_signature_verifies() {
        let body = br#"{"event":"charge.success","data":{"reference":"o1","status":"success"}}"#;
        let sig = signature(SECRET, body).unwrap();
        gateway_with_secret(SECRET)
            .verify(body, Some(&sig))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_tampered_body_is_unauthorized() {
        let sig = signature(SECRET, b"{\"event\":\"charge.success\"}").unwrap();
        let err = gateway_with_secret(SECRET)
            .verify(b"{\"event\":\"charge.failed\"}", Some(&sig))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_missing_or_garbage_signature_is_unauthorized() {
        let gateway = gateway_with_secret(SECRET);
        assert!(matches!(
            gateway.verify(b"{}", None).await.unwrap_err(),
            AppError::Unauthorized
        ));
        assert!(matches!(
            gateway.verify(b"{}", Some("zz-not-hex")).await.unwrap_err(),
            AppError::Unauthorized
        ));
    }

    #[tokio::test]
    async fn test_missing_secret_is_config_error() {
        let gateway = gateway_with_secret("");
        let err = gateway.verify(b"{}", Some("00")).await.unwrap_err();
        assert!(matches!(err, AppError::GatewayConfigError(_)));
    }

    #[tokio::test]
    async fn test_secret_read_on_every_call() {
        let store = Arc::new(InMemoryStore::new());
        let gateway = PaystackGateway::new(
            Client::new(),
            store.clone(),
            PaystackEndpoints {
                api_url: "http://127.0.0.1:9".to_string(),
                callback_url: "http://localhost:3000/order-confirmation".to_string(),
            },
        );
        assert!(gateway.verify(b"{}", Some("00")).await.is_err());

        let mut settings = store.get_settings().await.unwrap();
        settings.paystack_secret_key = SECRET.to_string();
        store.save_settings(settings).await.unwrap();

        let sig = signature(SECRET, b"{}").unwrap();
        gateway.verify(b"{}", Some(&sig)).await.unwrap();
    }

    #[test]
    fn test_charge_success_with_numeric_id() {
        let body = br#"{"event":"charge.success","data":{"reference":"o1","status":"success","id":302961}}"#;
        let outcome = gateway_with_secret(SECRET)
            .extract_outcome(body)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.outcome, PaymentOutcome::Succeeded);
        assert_eq!(outcome.reference.as_deref(), Some("o1"));
        assert_eq!(outcome.transaction_id.as_deref(), Some("302961"));
    }

    #[test]
    fn test_other_events_are_ignored() {
        let body = br#"{"event":"transfer.success","data":{"reference":"o1"}}"#;
        let outcome = gateway_with_secret(SECRET).extract_outcome(body).unwrap();
        assert_eq!(outcome, None);
    }

    #[test]
    fn test_charge_with_failed_status_maps_to_failure() {
        let body = br#"{"event":"charge.success","data":{"reference":"o1","status":"failed"}}"#;
        let outcome = gateway_with_secret(SECRET)
            .extract_outcome(body)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.outcome, PaymentOutcome::Failed);
    }
}
