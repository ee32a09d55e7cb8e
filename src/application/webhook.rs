use super::activity::ActivityRecorder;
use crate::domain::order::OrderStatus;
use crate::domain::payment::{PaymentOutcome, PaymentStatus, WebhookOutcome};
use crate::domain::ports::{Stores, WebhookReceiver};
use crate::error::{AppError, Result};
use serde::Serialize;
use serde_json::json;
use tracing::{Instrument, info, info_span, warn};

/// How a delivered callback was handled. Both variants are acknowledged to the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum WebhookAck {
    Processed {
        #[serde(rename = "orderId")]
        order_id: String,
        status: OrderStatus,
    },
    Ignored {
        reason: String,
    },
}

/// Applies provider callbacks to orders and payments.
///
/// Re-delivering the same callback re-applies the same transition.
#[derive(Clone)]
pub struct WebhookService {
    stores: Stores,
    activity: ActivityRecorder,
}

impl WebhookService {
    pub fn new(stores: Stores) -> Self {
        let activity = ActivityRecorder::new(stores.activity.clone());
        Self { stores, activity }
    }

    pub async fn handle(
        &self,
        receiver: &dyn WebhookReceiver,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookAck> {
        let span = info_span!("webhook", gateway = %receiver.gateway());
        async {
            receiver.verify(body, signature).await?;
            match receiver.extract_outcome(body)? {
                Some(outcome) => self.reconcile(outcome).await,
                None => Ok(WebhookAck::Ignored {
                    reason: "event not handled".to_string(),
                }),
            }
        }
        .instrument(span)
        .await
    }

    async fn reconcile(&self, outcome: WebhookOutcome) -> Result<WebhookAck> {
        let Some(order_id) = outcome.reference else {
            warn!("Failure callback without a reference; nothing to update");
            return Ok(WebhookAck::Ignored {
                reason: "no reference".to_string(),
            });
        };

        let (order_status, payment_status) = match outcome.outcome {
            PaymentOutcome::Succeeded => (OrderStatus::Completed, PaymentStatus::Succeeded),
            PaymentOutcome::Failed => (OrderStatus::Cancelled, PaymentStatus::Failed),
        };

        self.stores
            .orders
            .update_order_status(&order_id, order_status)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => {
                    AppError::ReconciliationError(format!("Order {order_id} does not exist"))
                }
                other => other,
            })?;

        let payment = self
            .stores
            .payments
            .update_payment_status_by_order(&order_id, payment_status, outcome.transaction_id.clone())
            .await?;
        if payment.is_none() {
            warn!(%order_id, "No payment recorded for order; only the order was updated");
        }

        info!(%order_id, status = %order_status, "Order reconciled from webhook");
        self.activity
            .admin_action(
                None,
                format!("Order {order_id} status updated to {order_status} via webhook."),
                json!({
                    "orderId": order_id,
                    "status": order_status,
                    "paymentStatus": payment_status,
                    "transactionId": outcome.transaction_id,
                }),
            )
            .await;

        Ok(WebhookAck::Processed {
            order_id,
            status: order_status,
        })
    }
}
