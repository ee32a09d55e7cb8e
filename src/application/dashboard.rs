use super::orders::OrderAdminService;
use crate::domain::order::Order;
use crate::domain::payment::PaymentStatus;
use crate::domain::ports::SharedCatalogStore;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

const RECENT_ORDERS: usize = 5;
const TOP_ITEMS: usize = 5;

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    pub id: String,
    pub name: String,
    pub quantity: u64,
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Sum of succeeded payments.
    pub total_revenue: Decimal,
    pub total_orders: usize,
    pub total_customers: usize,
    pub total_menu_items: usize,
    pub recent_orders: Vec<Order>,
    pub top_items: Vec<TopItem>,
}

#[derive(Clone)]
pub struct DashboardService {
    orders: OrderAdminService,
    catalog: SharedCatalogStore,
}

impl DashboardService {
    pub fn new(orders: OrderAdminService, catalog: SharedCatalogStore) -> Self {
        Self { orders, catalog }
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        let orders = self.orders.orders().await?;
        let payments = self.orders.payments().await?;
        let customers = self.orders.customers().await?;
        let menu_items = self.catalog.menu_items().await?;

        let total_revenue: Decimal = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Succeeded)
            .fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.amount));

        Ok(DashboardStats {
            total_revenue,
            total_orders: orders.len(),
            total_customers: customers.len(),
            total_menu_items: menu_items.len(),
            top_items: top_items(&orders, TOP_ITEMS),
            recent_orders: orders.into_iter().take(RECENT_ORDERS).collect(),
        })
    }
}

/// Best sellers by quantity across every order. Ties break by name.
fn top_items(orders: &[Order], limit: usize) -> Vec<TopItem> {
    let mut tally: HashMap<&str, TopItem> = HashMap::new();
    for line in orders.iter().flat_map(|o| &o.items) {
        tally
            .entry(line.id.as_str())
            .or_insert_with(|| TopItem {
                id: line.id.clone(),
                name: line.name.clone(),
                quantity: 0,
            })
            .quantity += u64::from(line.quantity);
    }

    let mut items: Vec<TopItem> = tally.into_values().collect();
    items.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    items.truncate(limit);
    items
}
