use super::AppState;
use crate::application::activity::DEFAULT_RECENT_LIMIT;
use crate::application::dashboard::DashboardStats;
use crate::domain::activity::ActivityLog;
use crate::domain::catalog::{Category, MenuItem, MenuItemInput};
use crate::domain::customer::{Customer, Visitor};
use crate::domain::feedback::{Message, Rating};
use crate::domain::order::{Order, OrderStatus};
use crate::domain::payment::Payment;
use crate::domain::settings::{Settings, SettingsUpdate};
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Header carrying the signed-in admin's email, set by the auth layer in front of this service.
pub const ADMIN_EMAIL_HEADER: &str = "x-admin-email";

const DEFAULT_STALE_MINUTES: i64 = 60;

fn actor(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ADMIN_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

pub async fn dashboard_handler(State(state): State<AppState>) -> Result<Json<DashboardStats>> {
    Ok(Json(state.services.dashboard.stats().await?))
}

// Menu

pub async fn list_menu_items_handler(State(state): State<AppState>) -> Result<Json<Vec<MenuItem>>> {
    Ok(Json(state.services.catalog.menu_items().await?))
}

pub async fn create_menu_item_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<MenuItemInput>,
) -> Result<(StatusCode, Json<MenuItem>)> {
    let item = state
        .services
        .catalog
        .create_menu_item(input, actor(&headers))
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_menu_item_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<MenuItemInput>,
) -> Result<Json<MenuItem>> {
    let item = state
        .services
        .catalog
        .update_menu_item(&id, input, actor(&headers))
        .await?;
    Ok(Json(item))
}

pub async fn delete_menu_item_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    state
        .services
        .catalog
        .delete_menu_item(&id, actor(&headers))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct CategoryBody {
    name: String,
}

pub async fn list_categories_handler(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.services.catalog.categories().await?))
}

pub async fn create_category_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CategoryBody>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = state
        .services
        .catalog
        .create_category(&body.name, actor(&headers))
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn rename_category_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<CategoryBody>,
) -> Result<Json<Category>> {
    let category = state
        .services
        .catalog
        .rename_category(&id, &body.name, actor(&headers))
        .await?;
    Ok(Json(category))
}

pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    state
        .services
        .catalog
        .delete_category(&id, actor(&headers))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Orders, payments, customers

pub async fn list_orders_handler(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.services.orders.orders().await?))
}

#[derive(Deserialize)]
pub struct StatusBody {
    status: OrderStatus,
}

pub async fn set_order_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<StatusBody>,
) -> Result<Json<Order>> {
    let order = state
        .services
        .orders
        .set_status(&id, body.status, actor(&headers))
        .await?;
    Ok(Json(order))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StaleSweepBody {
    older_than_minutes: Option<i64>,
}

pub async fn cancel_stale_orders_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<StaleSweepBody>>,
) -> Result<Json<Value>> {
    let minutes = body
        .and_then(|Json(b)| b.older_than_minutes)
        .unwrap_or(DEFAULT_STALE_MINUTES);
    let max_age = Some(minutes)
        .filter(|m| *m >= 0)
        .and_then(chrono::Duration::try_minutes)
        .ok_or_else(|| {
            AppError::ValidationError("olderThanMinutes is out of range.".to_string())
        })?;
    let cancelled = state
        .services
        .orders
        .cancel_stale_pending(max_age, actor(&headers))
        .await?;
    Ok(Json(json!({ "cancelled": cancelled })))
}

pub async fn list_payments_handler(State(state): State<AppState>) -> Result<Json<Vec<Payment>>> {
    Ok(Json(state.services.orders.payments().await?))
}

pub async fn list_customers_handler(State(state): State<AppState>) -> Result<Json<Vec<Customer>>> {
    Ok(Json(state.services.orders.customers().await?))
}

// Visitors, messages, ratings

pub async fn list_visitors_handler(State(state): State<AppState>) -> Result<Json<Vec<Visitor>>> {
    Ok(Json(state.services.engagement.visitors().await?))
}

pub async fn delete_visitor_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    state
        .services
        .engagement
        .delete_visitor(&id, actor(&headers))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_messages_handler(State(state): State<AppState>) -> Result<Json<Vec<Message>>> {
    Ok(Json(state.services.engagement.messages().await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadBody {
    is_read: bool,
}

pub async fn set_message_read_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ReadBody>,
) -> Result<Json<Message>> {
    let message = state
        .services
        .engagement
        .set_message_read(&id, body.is_read, actor(&headers))
        .await?;
    Ok(Json(message))
}

pub async fn delete_message_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    state
        .services
        .engagement
        .delete_message(&id, actor(&headers))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_ratings_handler(State(state): State<AppState>) -> Result<Json<Vec<Rating>>> {
    Ok(Json(state.services.engagement.ratings().await?))
}

pub async fn delete_rating_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    state
        .services
        .engagement
        .delete_rating(&id, actor(&headers))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Settings and activity

pub async fn get_settings_handler(State(state): State<AppState>) -> Result<Json<Settings>> {
    Ok(Json(state.services.settings.settings().await?))
}

pub async fn update_settings_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<Settings>> {
    let settings = state
        .services
        .settings
        .update(update, actor(&headers))
        .await?;
    Ok(Json(settings))
}

#[derive(Deserialize)]
pub struct ActivityQuery {
    limit: Option<usize>,
}

pub async fn activity_handler(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityLog>>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    Ok(Json(state.services.activity.recent(limit).await?))
}
