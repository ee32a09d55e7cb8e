use crate::domain::activity::ActivityLog;
use crate::domain::catalog::{Category, MenuItem};
use crate::domain::customer::{Customer, NewCustomer, Visitor};
use crate::domain::feedback::{Message, Rating};
use crate::domain::new_id;
use crate::domain::order::{NewOrder, Order, OrderStatus};
use crate::domain::payment::{NewPayment, Payment, PaymentStatus};
use crate::domain::ports::{
    ActivityStore, CatalogStore, CustomerStore, FeedbackStore, OrderStore, PaymentStore,
    SettingsStore, VisitorStore,
};
use crate::domain::settings::Settings;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type Collection<T> = Arc<RwLock<HashMap<String, T>>>;

/// A thread-safe in-memory document store implementing every storage port.
///
/// Each collection sits behind its own `RwLock`, so a checkout writing orders does
/// not block a reader listing the menu. Cloning shares the underlying data.
/// Ideal for tests and single-process deployments where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    settings: Arc<RwLock<Option<Settings>>>,
    customers: Collection<Customer>,
    orders: Collection<Order>,
    payments: Collection<Payment>,
    visitors: Collection<Visitor>,
    menu_items: Collection<MenuItem>,
    categories: Collection<Category>,
    ratings: Collection<Rating>,
    messages: Collection<Message>,
    activity: Arc<RwLock<Vec<ActivityLog>>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose settings document is already populated.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Some(settings))),
            ..Self::default()
        }
    }
}

async fn remove<T>(collection: &Collection<T>, id: &str) -> bool {
    collection.write().await.remove(id).is_some()
}

#[async_trait]
impl SettingsStore for InMemoryStore {
    async fn get_settings(&self) -> Result<Settings> {
        Ok(self.settings.read().await.clone().unwrap_or_default())
    }

    async fn save_settings(&self, settings: Settings) -> Result<()> {
        *self.settings.write().await = Some(settings);
        Ok(())
    }
}

#[async_trait]
impl CustomerStore for InMemoryStore {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.values().find(|c| c.email == email).cloned())
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer> {
        let customer = customer.into_customer(new_id(), Utc::now());
        let mut customers = self.customers.write().await;
        customers.insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, id: &str) -> Result<Option<Customer>> {
        Ok(self.customers.read().await.get(id).cloned())
    }

    async fn all_customers(&self) -> Result<Vec<Customer>> {
        let mut customers: Vec<_> = self.customers.read().await.values().cloned().collect();
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(customers)
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn create_order(&self, order: NewOrder) -> Result<Order> {
        let order = order.into_order(new_id(), Utc::now());
        let mut orders = self.orders.write().await;
        orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: &str) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(id).cloned())
    }

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
        order.status = status;
        Ok(order.clone())
    }

    async fn all_orders(&self) -> Result<Vec<Order>> {
        let mut orders: Vec<_> = self.orders.read().await.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

#[async_trait]
impl PaymentStore for InMemoryStore {
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment> {
        let payment = payment.into_payment(new_id(), Utc::now());
        let mut payments = self.payments.write().await;
        payments.insert(payment.id.clone(), payment.clone());
        Ok(payment)
    }

    async fn payment_for_order(&self, order_id: &str) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.values().find(|p| p.order_id == order_id).cloned())
    }

    async fn update_payment_status_by_order(
        &self,
        order_id: &str,
        status: PaymentStatus,
        transaction_id: Option<String>,
    ) -> Result<Option<Payment>> {
        let mut payments = self.payments.write().await;
        let Some(payment) = payments.values_mut().find(|p| p.order_id == order_id) else {
            return Ok(None);
        };
        payment.settle(status, transaction_id);
        Ok(Some(payment.clone()))
    }

    async fn all_payments(&self) -> Result<Vec<Payment>> {
        let mut payments: Vec<_> = self.payments.read().await.values().cloned().collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }
}

#[async_trait]
impl VisitorStore for InMemoryStore {
    async fn find_visitor_by_phone(&self, phone: &str) -> Result<Option<Visitor>> {
        let visitors = self.visitors.read().await;
        Ok(visitors.values().find(|v| v.phone == phone).cloned())
    }

    async fn add_visitor(&self, visitor: Visitor) -> Result<()> {
        self.visitors
            .write()
            .await
            .insert(visitor.id.clone(), visitor);
        Ok(())
    }

    async fn all_visitors(&self) -> Result<Vec<Visitor>> {
        let mut visitors: Vec<_> = self.visitors.read().await.values().cloned().collect();
        visitors.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visitors)
    }

    async fn delete_visitor(&self, id: &str) -> Result<bool> {
        Ok(remove(&self.visitors, id).await)
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn menu_items(&self) -> Result<Vec<MenuItem>> {
        let mut items: Vec<_> = self.menu_items.read().await.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn menu_item(&self, id: &str) -> Result<Option<MenuItem>> {
        Ok(self.menu_items.read().await.get(id).cloned())
    }

    async fn save_menu_item(&self, item: MenuItem) -> Result<()> {
        self.menu_items.write().await.insert(item.id.clone(), item);
        Ok(())
    }

    async fn delete_menu_item(&self, id: &str) -> Result<bool> {
        Ok(remove(&self.menu_items, id).await)
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let mut categories: Vec<_> = self.categories.read().await.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn category(&self, id: &str) -> Result<Option<Category>> {
        Ok(self.categories.read().await.get(id).cloned())
    }

    async fn save_category(&self, category: Category) -> Result<()> {
        self.categories
            .write()
            .await
            .insert(category.id.clone(), category);
        Ok(())
    }

    async fn delete_category(&self, id: &str) -> Result<bool> {
        Ok(remove(&self.categories, id).await)
    }
}

#[async_trait]
impl FeedbackStore for InMemoryStore {
    async fn add_rating(&self, rating: Rating) -> Result<()> {
        self.ratings.write().await.insert(rating.id.clone(), rating);
        Ok(())
    }

    async fn ratings(&self) -> Result<Vec<Rating>> {
        let mut ratings: Vec<_> = self.ratings.read().await.values().cloned().collect();
        ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ratings)
    }

    async fn delete_rating(&self, id: &str) -> Result<bool> {
        Ok(remove(&self.ratings, id).await)
    }

    async fn add_message(&self, message: Message) -> Result<()> {
        self.save_message(message).await
    }

    async fn messages(&self) -> Result<Vec<Message>> {
        let mut messages: Vec<_> = self.messages.read().await.values().cloned().collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    async fn message(&self, id: &str) -> Result<Option<Message>> {
        Ok(self.messages.read().await.get(id).cloned())
    }

    async fn save_message(&self, message: Message) -> Result<()> {
        self.messages
            .write()
            .await
            .insert(message.id.clone(), message);
        Ok(())
    }

    async fn delete_message(&self, id: &str) -> Result<bool> {
        Ok(remove(&self.messages, id).await)
    }
}

#[async_trait]
impl ActivityStore for InMemoryStore {
    async fn record_activity(&self, log: ActivityLog) -> Result<()> {
        self.activity.write().await.push(log);
        Ok(())
    }

    async fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityLog>> {
        let activity = self.activity.read().await;
        Ok(activity.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::ActivityAction;
    use crate::domain::order::{DeliveryMethod, OrderLine};
    use crate::domain::payment::Gateway;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn new_order() -> NewOrder {
        NewOrder::from_cart(
            "customer-1".to_string(),
            vec![OrderLine {
                id: "m1".to_string(),
                name: "Kelewele".to_string(),
                price: dec!(8.00),
                quantity: 1,
                image: String::new(),
            }],
            dec!(8.00),
            DeliveryMethod::Pickup,
            "vodafone-gh".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_settings_default_until_saved() {
        let store = InMemoryStore::new();
        assert_eq!(store.get_settings().await.unwrap(), Settings::default());

        let settings = Settings {
            delivery_fee: dec!(5.00),
            ..Settings::default()
        };
        store.save_settings(settings.clone()).await.unwrap();
        assert_eq!(store.get_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_order_status_update() {
        let store = InMemoryStore::new();
        let order = store.create_order(new_order()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let updated = store
            .update_order_status(&order.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Completed);
        assert_eq!(updated.items, order.items);

        let missing = store
            .update_order_status("nope", OrderStatus::Completed)
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_payment_updated_in_place_by_order() {
        let store = InMemoryStore::new();
        let payment = store
            .create_payment(NewPayment {
                order_id: "order-1".to_string(),
                amount: dec!(8.00),
                gateway: Gateway::Paystack,
            })
            .await
            .unwrap();

        let settled = store
            .update_payment_status_by_order(
                "order-1",
                PaymentStatus::Succeeded,
                Some("tx-1".to_string()),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(settled.id, payment.id);
        assert_eq!(settled.status, PaymentStatus::Succeeded);
        assert_eq!(store.all_payments().await.unwrap().len(), 1);

        let none = store
            .update_payment_status_by_order("order-2", PaymentStatus::Failed, None)
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_customer_lookup_by_email() {
        let store = InMemoryStore::new();
        let created = store
            .create_customer(NewCustomer {
                name: "Yaw".to_string(),
                email: "yaw@example.com".to_string(),
                phone: "0201112223".to_string(),
                location: "Tema".to_string(),
            })
            .await
            .unwrap();

        let found = store
            .find_customer_by_email("yaw@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, created);
        assert!(
            store
                .find_customer_by_email("other@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_recent_activity_newest_first() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .record_activity(ActivityLog::new(
                    ActivityAction::AdminAction,
                    format!("action {i}"),
                    json!({}),
                ))
                .await
                .unwrap();
        }

        let recent = store.recent_activity(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].description, "action 4");
        assert_eq!(recent[1].description, "action 3");
    }
}
