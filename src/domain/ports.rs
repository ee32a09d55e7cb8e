use super::activity::ActivityLog;
use super::catalog::{Category, MenuItem};
use super::customer::{Customer, NewCustomer, Visitor};
use super::feedback::{Message, Rating};
use super::order::{NewOrder, Order, OrderStatus};
use super::payment::{Gateway, NewPayment, Payment, PaymentRequest, PaymentStatus, WebhookOutcome};
use super::settings::Settings;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of the settings document. Read on every use so edits apply immediately.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_settings(&self) -> Result<Settings>;
    async fn save_settings(&self, settings: Settings) -> Result<()>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>>;
    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer>;
    async fn get_customer(&self, id: &str) -> Result<Option<Customer>>;
    async fn all_customers(&self) -> Result<Vec<Customer>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_order(&self, order: NewOrder) -> Result<Order>;
    async fn get_order(&self, id: &str) -> Result<Option<Order>>;
    /// Fails with `NotFound` when no order has this id.
    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<Order>;
    async fn all_orders(&self) -> Result<Vec<Order>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment>;
    async fn payment_for_order(&self, order_id: &str) -> Result<Option<Payment>>;
    /// Settles the payment attached to `order_id` in place.
    ///
    /// Returns `None` when the order has no payment record.
    async fn update_payment_status_by_order(
        &self,
        order_id: &str,
        status: PaymentStatus,
        transaction_id: Option<String>,
    ) -> Result<Option<Payment>>;
    async fn all_payments(&self) -> Result<Vec<Payment>>;
}

#[async_trait]
pub trait VisitorStore: Send + Sync {
    async fn find_visitor_by_phone(&self, phone: &str) -> Result<Option<Visitor>>;
    async fn add_visitor(&self, visitor: Visitor) -> Result<()>;
    async fn all_visitors(&self) -> Result<Vec<Visitor>>;
    async fn delete_visitor(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn menu_items(&self) -> Result<Vec<MenuItem>>;
    async fn menu_item(&self, id: &str) -> Result<Option<MenuItem>>;
    async fn save_menu_item(&self, item: MenuItem) -> Result<()>;
    async fn delete_menu_item(&self, id: &str) -> Result<bool>;
    async fn categories(&self) -> Result<Vec<Category>>;
    async fn category(&self, id: &str) -> Result<Option<Category>>;
    async fn save_category(&self, category: Category) -> Result<()>;
    async fn delete_category(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn add_rating(&self, rating: Rating) -> Result<()>;
    async fn ratings(&self) -> Result<Vec<Rating>>;
    async fn delete_rating(&self, id: &str) -> Result<bool>;
    async fn add_message(&self, message: Message) -> Result<()>;
    async fn messages(&self) -> Result<Vec<Message>>;
    async fn message(&self, id: &str) -> Result<Option<Message>>;
    async fn save_message(&self, message: Message) -> Result<()>;
    async fn delete_message(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn record_activity(&self, log: ActivityLog) -> Result<()>;
    /// The most recent `limit` entries, newest first.
    async fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityLog>>;
}

/// Outbound side of a payment provider: opens a hosted checkout session.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn gateway(&self) -> Gateway;

    /// Whether checkout must carry a mobile-money channel selector for this provider.
    fn requires_channel(&self) -> bool;

    /// Makes exactly one call to the provider and returns the redirect URL.
    ///
    /// Every provider-side failure comes back as `GatewayError` or
    /// `GatewayConfigError` carrying a message fit for the customer.
    async fn initiate(&self, request: &PaymentRequest) -> Result<String>;
}

/// Inbound side of a payment provider: authenticates and decodes callbacks.
#[async_trait]
pub trait WebhookReceiver: Send + Sync {
    fn gateway(&self) -> Gateway;

    /// Authenticates the raw callback body. `Unauthorized` means nothing may be written.
    async fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<()>;

    /// Decodes the callback. `None` means the event is not one this service acts on.
    fn extract_outcome(&self, body: &[u8]) -> Result<Option<WebhookOutcome>>;
}

pub type SharedSettingsStore = Arc<dyn SettingsStore>;
pub type SharedCustomerStore = Arc<dyn CustomerStore>;
pub type SharedOrderStore = Arc<dyn OrderStore>;
pub type SharedPaymentStore = Arc<dyn PaymentStore>;
pub type SharedVisitorStore = Arc<dyn VisitorStore>;
pub type SharedCatalogStore = Arc<dyn CatalogStore>;
pub type SharedFeedbackStore = Arc<dyn FeedbackStore>;
pub type SharedActivityStore = Arc<dyn ActivityStore>;

pub type SharedPaymentGateway = Arc<dyn PaymentGateway>;
pub type SharedWebhookReceiver = Arc<dyn WebhookReceiver>;

/// One outbound adapter per provider; checkout picks by the configured gateway.
#[derive(Clone)]
pub struct PaymentGateways {
    hubtel: SharedPaymentGateway,
    paystack: SharedPaymentGateway,
}

impl PaymentGateways {
    pub fn new(hubtel: SharedPaymentGateway, paystack: SharedPaymentGateway) -> Self {
        Self { hubtel, paystack }
    }

    pub fn get(&self, gateway: Gateway) -> &SharedPaymentGateway {
        match gateway {
            Gateway::Hubtel => &self.hubtel,
            Gateway::Paystack => &self.paystack,
        }
    }
}

/// Every port wired to a backend.
#[derive(Clone)]
pub struct Stores {
    pub settings: SharedSettingsStore,
    pub customers: SharedCustomerStore,
    pub orders: SharedOrderStore,
    pub payments: SharedPaymentStore,
    pub visitors: SharedVisitorStore,
    pub catalog: SharedCatalogStore,
    pub feedback: SharedFeedbackStore,
    pub activity: SharedActivityStore,
}

impl Stores {
    /// Wires every port to one backend that implements all of them.
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: SettingsStore
            + CustomerStore
            + OrderStore
            + PaymentStore
            + VisitorStore
            + CatalogStore
            + FeedbackStore
            + ActivityStore
            + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            settings: backend.clone(),
            customers: backend.clone(),
            orders: backend.clone(),
            payments: backend.clone(),
            visitors: backend.clone(),
            catalog: backend.clone(),
            feedback: backend.clone(),
            activity: backend,
        }
    }
}
