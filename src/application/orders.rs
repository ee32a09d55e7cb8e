use super::activity::ActivityRecorder;
use crate::domain::customer::Customer;
use crate::domain::order::{CustomerDetails, Order, OrderStatus};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::ports::Stores;
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, warn};

/// Back-office view of orders, payments and customers.
#[derive(Clone)]
pub struct OrderAdminService {
    stores: Stores,
    activity: ActivityRecorder,
}

impl OrderAdminService {
    pub fn new(stores: Stores, activity: ActivityRecorder) -> Self {
        Self { stores, activity }
    }

    /// All orders, newest first, with the customer's name and email attached.
    pub async fn orders(&self) -> Result<Vec<Order>> {
        let customers: HashMap<String, Customer> = self
            .stores
            .customers
            .all_customers()
            .await?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        let mut orders = self.stores.orders.all_orders().await?;
        for order in &mut orders {
            order.customer_details = customers.get(&order.customer_id).map(|c| CustomerDetails {
                name: c.name.clone(),
                email: c.email.clone(),
            });
        }
        Ok(orders)
    }

    pub async fn payments(&self) -> Result<Vec<Payment>> {
        self.stores.payments.all_payments().await
    }

    pub async fn customers(&self) -> Result<Vec<Customer>> {
        self.stores.customers.all_customers().await
    }

    pub async fn set_status(&self, order_id: &str, status: OrderStatus, actor: Option<&str>) -> Result<Order> {
        let order = self.stores.orders.update_order_status(order_id, status).await?;
        info!(%order_id, %status, "Order status changed by admin");
        self.activity
            .admin_action(
                actor,
                format!("Order {order_id} status updated to {status}"),
                json!({ "orderId": order_id, "status": status }),
            )
            .await;
        Ok(order)
    }

    /// Cancels orders still `Pending` after `max_age` and fails their payments.
    ///
    /// Compensates for checkouts whose gateway call failed or was abandoned.
    /// Returns the ids of the cancelled orders.
    pub async fn cancel_stale_pending(&self, max_age: Duration, actor: Option<&str>) -> Result<Vec<String>> {
        let cutoff = Utc::now()
            .checked_sub_signed(max_age)
            .ok_or_else(|| AppError::ValidationError("Stale order age is out of range.".to_string()))?;
        let stale: Vec<Order> = self
            .stores
            .orders
            .all_orders()
            .await?
            .into_iter()
            .filter(|o| o.status == OrderStatus::Pending && o.created_at < cutoff)
            .collect();

        let mut cancelled = Vec::with_capacity(stale.len());
        for order in stale {
            self.stores
                .orders
                .update_order_status(&order.id, OrderStatus::Cancelled)
                .await?;
            let payment = self
                .stores
                .payments
                .update_payment_status_by_order(&order.id, PaymentStatus::Failed, None)
                .await?;
            if payment.is_none() {
                warn!(order_id = %order.id, "Stale order had no payment record");
            }
            cancelled.push(order.id);
        }

        if !cancelled.is_empty() {
            info!(count = cancelled.len(), "Cancelled stale pending orders");
            self.activity
                .admin_action(
                    actor,
                    format!("Cancelled {} stale pending orders", cancelled.len()),
                    json!({ "orderIds": cancelled, "maxAgeMinutes": max_age.num_minutes() }),
                )
                .await;
        }
        Ok(cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::NewCustomer;
    use crate::domain::order::{DeliveryMethod, NewOrder, OrderLine};
    use crate::domain::payment::{Gateway, NewPayment};
    use crate::infrastructure::in_memory::InMemoryStore;
    use rust_decimal_macros::dec;

    fn service() -> (OrderAdminService, Stores) {
        let stores = Stores::from_backend(InMemoryStore::new());
        let activity = ActivityRecorder::new(stores.activity.clone());
        (OrderAdminService::new(stores.clone(), activity), stores)
    }

    async fn place_order(stores: &Stores) -> Order {
        let customer = stores
            .customers
            .create_customer(NewCustomer {
                name: "Kofi".to_string(),
                email: "kofi@example.com".to_string(),
                phone: "0501234567".to_string(),
                location: "Self-pickup".to_string(),
            })
            .await
            .unwrap();
        let items = vec![OrderLine {
            id: "m1".to_string(),
            name: "Banku".to_string(),
            price: dec!(30),
            quantity: 1,
            image: String::new(),
        }];
        let order = stores
            .orders
            .create_order(NewOrder::from_cart(
                customer.id,
                items,
                dec!(30),
                DeliveryMethod::Pickup,
                "vodafone-gh".to_string(),
            ).unwrap())
            .await
            .unwrap();
        stores
            .payments
            .create_payment(NewPayment {
                order_id: order.id.clone(),
                amount: order.total,
                gateway: Gateway::Hubtel,
            })
            .await
            .unwrap();
        order
    }

    #[tokio::test]
    async fn test_orders_carry_customer_details() {
        let (service, stores) = service();
        place_order(&stores).await;
        let orders = service.orders().await.unwrap();
        let details = orders[0].customer_details.as_ref().unwrap();
        assert_eq!(details.name, "Kofi");
        assert_eq!(details.email, "kofi@example.com");
    }

    #[tokio::test]
    async fn test_admin_status_change_is_logged() {
        let (service, stores) = service();
        let order = place_order(&stores).await;
        let updated = service
            .set_status(&order.id, OrderStatus::Processing, Some("ops@bitecraft.example"))
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Processing);

        let log = stores.activity.recent_activity(1).await.unwrap();
        assert_eq!(log[0].details["adminEmail"], "ops@bitecraft.example");
        assert!(matches!(
            service.set_status("missing", OrderStatus::Completed, None).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_sweep_cancels_only_old_pending_orders() {
        let (service, stores) = service();
        let pending = place_order(&stores).await;
        let completed = place_order(&stores).await;
        stores
            .orders
            .update_order_status(&completed.id, OrderStatus::Completed)
            .await
            .unwrap();

        // Nothing is older than an hour yet.
        assert!(service.cancel_stale_pending(Duration::hours(1), None).await.unwrap().is_empty());

        let cancelled = service.cancel_stale_pending(Duration::zero(), None).await.unwrap();
        assert_eq!(cancelled, vec![pending.id.clone()]);

        let order = stores.orders.get_order(&pending.id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        let payment = stores.payments.payment_for_order(&pending.id).await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Failed);
        let kept = stores.orders.get_order(&completed.id).await.unwrap().unwrap();
        assert_eq!(kept.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_sweep_age_beyond_clock_range_is_rejected() {
        let (service, stores) = service();
        let order = place_order(&stores).await;

        let result = service.cancel_stale_pending(Duration::MAX, None).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        let kept = stores.orders.get_order(&order.id).await.unwrap().unwrap();
        assert_eq!(kept.status, OrderStatus::Pending);
    }
}
