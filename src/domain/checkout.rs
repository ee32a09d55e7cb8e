use super::contact::{digit_count, is_valid_email};
use super::order::{DeliveryMethod, OrderLine, invalid_cart, subtotal};
use crate::error::{AppError, Result};
use rust_decimal::Decimal;

/// A checkout submission after the wire format has been decoded.
#[derive(Debug, PartialEq, Clone)]
pub struct CheckoutRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub items: Vec<OrderLine>,
    pub total: Decimal,
    pub delivery_method: DeliveryMethod,
    pub channel: Option<String>,
}

impl CheckoutRequest {
    /// Checks the contact fields and cart lines.
    ///
    /// `channel_required` is set when the active gateway needs a mobile-money
    /// channel selector.
    pub fn validate(&self, channel_required: bool) -> Result<()> {
        if self.name.trim().chars().count() < 2 {
            return invalid("Name must be at least 2 characters.");
        }
        if digit_count(&self.phone) < 10 {
            return invalid("Please enter a valid phone number.");
        }
        if !is_valid_email(self.email.trim()) {
            return invalid("Please enter a valid email address.");
        }
        if self.delivery_method == DeliveryMethod::Delivery {
            let address_ok = self
                .address
                .as_deref()
                .is_some_and(|a| a.trim().chars().count() >= 5);
            if !address_ok {
                return invalid("Delivery address is required and must be at least 5 characters.");
            }
        }
        if channel_required && self.channel.as_deref().is_none_or(|c| c.trim().is_empty()) {
            return invalid("Payment channel is required.");
        }
        if self.items.is_empty() {
            return invalid("Your cart is empty.");
        }
        if self
            .items
            .iter()
            .any(|line| line.quantity == 0 || line.price < Decimal::ZERO)
            || subtotal(&self.items).is_none()
        {
            return Err(invalid_cart());
        }
        Ok(())
    }

    /// Rejects a total that disagrees with the cart and the configured fee.
    pub fn check_total(&self, configured_delivery_fee: Decimal) -> Result<()> {
        let fee = match self.delivery_method {
            DeliveryMethod::Delivery => configured_delivery_fee,
            DeliveryMethod::Pickup => Decimal::ZERO,
        };
        let expected = subtotal(&self.items)
            .and_then(|sum| sum.checked_add(fee))
            .ok_or_else(invalid_cart)?;
        if self.total != expected {
            return Err(AppError::ValidationError(format!(
                "Order total {} does not match cart total {expected}.",
                self.total
            )));
        }
        Ok(())
    }

    /// Location recorded on the customer: the delivery address, or a pickup marker.
    pub fn customer_location(&self) -> String {
        match (&self.delivery_method, self.address.as_deref()) {
            (DeliveryMethod::Delivery, Some(address)) => address.trim().to_string(),
            _ => "Self-pickup".to_string(),
        }
    }
}

fn invalid(reason: &str) -> Result<()> {
    Err(AppError::ValidationError(reason.to_string()))
}
