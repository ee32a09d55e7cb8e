use super::AppState;
use crate::application::webhook::WebhookAck;
use crate::error::Result;
use crate::infrastructure::paystack::SIGNATURE_HEADER;
use axum::{Json, body::Bytes, extract::State, http::HeaderMap};

pub async fn hubtel_callback_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<WebhookAck>> {
    let ack = state
        .services
        .webhooks
        .handle(state.hubtel_webhook.as_ref(), &body, None)
        .await?;
    Ok(Json(ack))
}

pub async fn paystack_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    let ack = state
        .services
        .webhooks
        .handle(state.paystack_webhook.as_ref(), &body, signature)
        .await?;
    Ok(Json(ack))
}
