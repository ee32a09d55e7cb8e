use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Delivery,
    Pickup,
}

/// A cart line captured at order time.
///
/// Price and name are a snapshot: later menu edits never reach an existing order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
}

impl OrderLine {
    /// `None` when price times quantity leaves the decimal range.
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Customer name and email joined onto an order for the admin listing.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub items: Vec<OrderLine>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub delivery_method: DeliveryMethod,
    pub status: OrderStatus,
    pub channel: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_details: Option<CustomerDetails>,
}

/// Everything needed to persist an order; the store assigns id and timestamp.
#[derive(Debug, PartialEq, Clone)]
pub struct NewOrder {
    pub customer_id: String,
    pub items: Vec<OrderLine>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub delivery_method: DeliveryMethod,
    pub channel: String,
}

impl NewOrder {
    /// Builds a pending order from cart lines and the client-submitted total.
    ///
    /// The delivery fee is whatever the total carries above the subtotal for
    /// delivery orders, and zero for pickup.
    pub fn from_cart(
        customer_id: String,
        items: Vec<OrderLine>,
        total: Decimal,
        delivery_method: DeliveryMethod,
        channel: String,
    ) -> Result<Self> {
        let subtotal = subtotal(&items).ok_or_else(invalid_cart)?;
        let delivery_fee = match delivery_method {
            DeliveryMethod::Delivery => total.checked_sub(subtotal).ok_or_else(invalid_cart)?,
            DeliveryMethod::Pickup => Decimal::ZERO,
        };
        Ok(Self {
            customer_id,
            items,
            subtotal,
            delivery_fee,
            total,
            delivery_method,
            channel,
        })
    }

    pub fn into_order(self, id: String, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            customer_id: self.customer_id,
            items: self.items,
            subtotal: self.subtotal,
            delivery_fee: self.delivery_fee,
            total: self.total,
            delivery_method: self.delivery_method,
            status: OrderStatus::Pending,
            channel: self.channel,
            created_at,
            customer_details: None,
        }
    }
}

/// Sum of the line totals, or `None` on overflow.
pub fn subtotal(items: &[OrderLine]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.line_total()?))
}

pub(crate) fn invalid_cart() -> AppError {
    AppError::ValidationError("Cart contains an invalid item.".to_string())
}
