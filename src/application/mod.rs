//! Application layer: the services that sequence domain rules over the ports.
//!
//! Checkout and webhook reconciliation are the payment core; the rest backs the
//! storefront and the admin back office.

pub mod activity;
pub mod catalog;
pub mod checkout;
pub mod dashboard;
pub mod engagement;
pub mod orders;
pub mod settings;
pub mod webhook;

use crate::domain::ports::{PaymentGateways, Stores};
use activity::ActivityRecorder;
use catalog::CatalogService;
use checkout::CheckoutService;
use dashboard::DashboardService;
use engagement::EngagementService;
use orders::OrderAdminService;
use settings::SettingsService;
use webhook::WebhookService;

/// Every service, wired to one set of stores and gateways.
#[derive(Clone)]
pub struct Services {
    pub checkout: CheckoutService,
    pub webhooks: WebhookService,
    pub catalog: CatalogService,
    pub orders: OrderAdminService,
    pub engagement: EngagementService,
    pub settings: SettingsService,
    pub dashboard: DashboardService,
    pub activity: ActivityRecorder,
}

impl Services {
    pub fn new(stores: Stores, gateways: PaymentGateways) -> Self {
        let activity = ActivityRecorder::new(stores.activity.clone());
        let orders = OrderAdminService::new(stores.clone(), activity.clone());
        Self {
            checkout: CheckoutService::new(stores.clone(), gateways),
            webhooks: WebhookService::new(stores.clone()),
            catalog: CatalogService::new(stores.catalog.clone(), activity.clone()),
            engagement: EngagementService::new(
                stores.feedback.clone(),
                stores.visitors.clone(),
                activity.clone(),
            ),
            settings: SettingsService::new(stores.settings.clone(), activity.clone()),
            dashboard: DashboardService::new(orders.clone(), stores.catalog.clone()),
            orders,
            activity,
        }
    }
}
