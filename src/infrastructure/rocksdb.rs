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
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

pub const CF_SETTINGS: &str = "settings";
pub const CF_CUSTOMERS: &str = "customers";
pub const CF_ORDERS: &str = "orders";
pub const CF_PAYMENTS: &str = "payments";
pub const CF_VISITORS: &str = "visitors";
pub const CF_MENU_ITEMS: &str = "menu_items";
pub const CF_CATEGORIES: &str = "categories";
pub const CF_RATINGS: &str = "ratings";
pub const CF_MESSAGES: &str = "messages";
/// Keyed by big-endian creation nanos followed by the log id, so keys sort by time.
pub const CF_ACTIVITY_LOGS: &str = "activity_logs";

const ALL_COLUMN_FAMILIES: [&str; 10] = [
    CF_SETTINGS,
    CF_CUSTOMERS,
    CF_ORDERS,
    CF_PAYMENTS,
    CF_VISITORS,
    CF_MENU_ITEMS,
    CF_CATEGORIES,
    CF_RATINGS,
    CF_MESSAGES,
    CF_ACTIVITY_LOGS,
];

const SETTINGS_KEY: &[u8] = b"app";

/// A persistent document store implementation using RocksDB.
///
/// Every collection lives in its own Column Family with JSON-encoded documents keyed
/// by id. Field lookups (customer by email, payment by order) scan the family, the
/// same way a document-store `where` query would on an unindexed field.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that every collection's column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = ALL_COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            AppError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn put<T: Serialize>(&self, family: &str, key: &[u8], document: &T) -> Result<()> {
        let cf = self.cf(family)?;
        let value = serde_json::to_vec(document)?;
        self.db.put_cf(cf, key, value)?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, family: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(family)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, family: &str, mode: IteratorMode<'_>) -> Result<Vec<T>> {
        let cf = self.cf(family)?;
        let mut documents = Vec::new();
        for item in self.db.iterator_cf(cf, mode) {
            let (_key, value) = item?;
            documents.push(serde_json::from_slice(&value)?);
        }
        Ok(documents)
    }

    fn all<T: DeserializeOwned>(&self, family: &str) -> Result<Vec<T>> {
        self.scan(family, IteratorMode::Start)
    }

    fn find<T, F>(&self, family: &str, predicate: F) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        Ok(self.all::<T>(family)?.into_iter().find(|doc| predicate(doc)))
    }

    fn delete(&self, family: &str, key: &[u8]) -> Result<bool> {
        let cf = self.cf(family)?;
        if self.db.get_pinned_cf(cf, key)?.is_none() {
            return Ok(false);
        }
        self.db.delete_cf(cf, key)?;
        Ok(true)
    }
}

fn newest_first<T, K: Ord>(mut documents: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    documents.sort_by(|a, b| key(b).cmp(&key(a)));
    documents
}

#[async_trait]
impl SettingsStore for RocksDBStore {
    async fn get_settings(&self) -> Result<Settings> {
        Ok(self
            .get::<Settings>(CF_SETTINGS, SETTINGS_KEY)?
            .unwrap_or_default())
    }

    async fn save_settings(&self, settings: Settings) -> Result<()> {
        self.put(CF_SETTINGS, SETTINGS_KEY, &settings)
    }
}

#[async_trait]
impl CustomerStore for RocksDBStore {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>> {
        self.find(CF_CUSTOMERS, |c: &Customer| c.email == email)
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer> {
        let customer = customer.into_customer(new_id(), Utc::now());
        self.put(CF_CUSTOMERS, customer.id.as_bytes(), &customer)?;
        Ok(customer)
    }

    async fn get_customer(&self, id: &str) -> Result<Option<Customer>> {
        self.get(CF_CUSTOMERS, id.as_bytes())
    }

    async fn all_customers(&self) -> Result<Vec<Customer>> {
        Ok(newest_first(self.all(CF_CUSTOMERS)?, |c: &Customer| {
            c.created_at
        }))
    }
}

#[async_trait]
impl OrderStore for RocksDBStore {
    async fn create_order(&self, order: NewOrder) -> Result<Order> {
        let order = order.into_order(new_id(), Utc::now());
        self.put(CF_ORDERS, order.id.as_bytes(), &order)?;
        Ok(order)
    }

    async fn get_order(&self, id: &str) -> Result<Option<Order>> {
        self.get(CF_ORDERS, id.as_bytes())
    }

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<Order> {
        let mut order: Order = self
            .get(CF_ORDERS, id.as_bytes())?
            .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
        order.status = status;
        self.put(CF_ORDERS, id.as_bytes(), &order)?;
        Ok(order)
    }

    async fn all_orders(&self) -> Result<Vec<Order>> {
        Ok(newest_first(self.all(CF_ORDERS)?, |o: &Order| o.created_at))
    }
}

#[async_trait]
impl PaymentStore for RocksDBStore {
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment> {
        let payment = payment.into_payment(new_id(), Utc::now());
        self.put(CF_PAYMENTS, payment.id.as_bytes(), &payment)?;
        Ok(payment)
    }

    async fn payment_for_order(&self, order_id: &str) -> Result<Option<Payment>> {
        self.find(CF_PAYMENTS, |p: &Payment| p.order_id == order_id)
    }

    async fn update_payment_status_by_order(
        &self,
        order_id: &str,
        status: PaymentStatus,
        transaction_id: Option<String>,
    ) -> Result<Option<Payment>> {
        let Some(mut payment) = self.payment_for_order(order_id).await? else {
            return Ok(None);
        };
        payment.settle(status, transaction_id);
        self.put(CF_PAYMENTS, payment.id.as_bytes(), &payment)?;
        Ok(Some(payment))
    }

    async fn all_payments(&self) -> Result<Vec<Payment>> {
        Ok(newest_first(self.all(CF_PAYMENTS)?, |p: &Payment| {
            p.created_at
        }))
    }
}

#[async_trait]
impl VisitorStore for RocksDBStore {
    async fn find_visitor_by_phone(&self, phone: &str) -> Result<Option<Visitor>> {
        self.find(CF_VISITORS, |v: &Visitor| v.phone == phone)
    }

    async fn add_visitor(&self, visitor: Visitor) -> Result<()> {
        self.put(CF_VISITORS, visitor.id.as_bytes(), &visitor)
    }

    async fn all_visitors(&self) -> Result<Vec<Visitor>> {
        Ok(newest_first(self.all(CF_VISITORS)?, |v: &Visitor| {
            v.created_at
        }))
    }

    async fn delete_visitor(&self, id: &str) -> Result<bool> {
        self.delete(CF_VISITORS, id.as_bytes())
    }
}

#[async_trait]
impl CatalogStore for RocksDBStore {
    async fn menu_items(&self) -> Result<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self.all(CF_MENU_ITEMS)?;
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn menu_item(&self, id: &str) -> Result<Option<MenuItem>> {
        self.get(CF_MENU_ITEMS, id.as_bytes())
    }

    async fn save_menu_item(&self, item: MenuItem) -> Result<()> {
        self.put(CF_MENU_ITEMS, item.id.as_bytes(), &item)
    }

    async fn delete_menu_item(&self, id: &str) -> Result<bool> {
        self.delete(CF_MENU_ITEMS, id.as_bytes())
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = self.all(CF_CATEGORIES)?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn category(&self, id: &str) -> Result<Option<Category>> {
        self.get(CF_CATEGORIES, id.as_bytes())
    }

    async fn save_category(&self, category: Category) -> Result<()> {
        self.put(CF_CATEGORIES, category.id.as_bytes(), &category)
    }

    async fn delete_category(&self, id: &str) -> Result<bool> {
        self.delete(CF_CATEGORIES, id.as_bytes())
    }
}

#[async_trait]
impl FeedbackStore for RocksDBStore {
    async fn add_rating(&self, rating: Rating) -> Result<()> {
        self.put(CF_RATINGS, rating.id.as_bytes(), &rating)
    }

    async fn ratings(&self) -> Result<Vec<Rating>> {
        Ok(newest_first(self.all(CF_RATINGS)?, |r: &Rating| r.created_at))
    }

    async fn delete_rating(&self, id: &str) -> Result<bool> {
        self.delete(CF_RATINGS, id.as_bytes())
    }

    async fn add_message(&self, message: Message) -> Result<()> {
        self.save_message(message).await
    }

    async fn messages(&self) -> Result<Vec<Message>> {
        Ok(newest_first(self.all(CF_MESSAGES)?, |m: &Message| {
            m.created_at
        }))
    }

    async fn message(&self, id: &str) -> Result<Option<Message>> {
        self.get(CF_MESSAGES, id.as_bytes())
    }

    async fn save_message(&self, message: Message) -> Result<()> {
        self.put(CF_MESSAGES, message.id.as_bytes(), &message)
    }

    async fn delete_message(&self, id: &str) -> Result<bool> {
        self.delete(CF_MESSAGES, id.as_bytes())
    }
}

#[async_trait]
impl ActivityStore for RocksDBStore {
    async fn record_activity(&self, log: ActivityLog) -> Result<()> {
        let nanos = log.created_at.timestamp_nanos_opt().unwrap_or_default();
        let mut key = nanos.to_be_bytes().to_vec();
        key.extend_from_slice(log.id.as_bytes());
        self.put(CF_ACTIVITY_LOGS, &key, &log)
    }

    async fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityLog>> {
        let cf = self.cf(CF_ACTIVITY_LOGS)?;
        let mut logs = Vec::with_capacity(limit);
        for item in self.db.iterator_cf(cf, IteratorMode::End).take(limit) {
            let (_key, value) = item?;
            logs.push(serde_json::from_slice(&value)?);
        }
        Ok(logs)
    }
}
