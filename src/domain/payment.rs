use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Succeeded => "Succeeded",
            PaymentStatus::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// The payment provider an order was sent to.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gateway {
    #[default]
    #[serde(alias = "Hubtel")]
    Hubtel,
    #[serde(alias = "Paystack")]
    Paystack,
}

impl fmt::Display for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gateway::Hubtel => f.write_str("Hubtel"),
            Gateway::Paystack => f.write_str("Paystack"),
        }
    }
}

impl FromStr for Gateway {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hubtel" => Ok(Gateway::Hubtel),
            "paystack" => Ok(Gateway::Paystack),
            other => Err(format!("unknown payment gateway: {other}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub gateway: Gateway,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Moves the payment to a terminal status.
    ///
    /// A missing transaction id leaves any previously recorded one in place.
    pub fn settle(&mut self, status: PaymentStatus, transaction_id: Option<String>) {
        self.status = status;
        if transaction_id.is_some() {
            self.transaction_id = transaction_id;
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct NewPayment {
    pub order_id: String,
    pub amount: Decimal,
    pub gateway: Gateway,
}

impl NewPayment {
    pub fn into_payment(self, id: String, created_at: DateTime<Utc>) -> Payment {
        Payment {
            id,
            order_id: self.order_id,
            amount: self.amount,
            status: PaymentStatus::Pending,
            gateway: self.gateway,
            transaction_id: None,
            created_at,
        }
    }
}

/// What checkout hands to a gateway adapter.
#[derive(Debug, PartialEq, Clone)]
pub struct PaymentRequest {
    /// Grand total in major units.
    pub amount: Decimal,
    pub description: String,
    /// The order id; providers echo it back on callbacks.
    pub client_reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub mobile_number: String,
    pub channel: Option<String>,
}

/// Terminal result a provider reported for a payment.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

/// A decoded provider callback.
#[derive(Debug, PartialEq, Clone)]
pub struct WebhookOutcome {
    pub outcome: PaymentOutcome,
    /// Order id echoed by the provider. Absent on some failure callbacks.
    pub reference: Option<String>,
    pub transaction_id: Option<String>,
}
