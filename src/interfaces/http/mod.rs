//! HTTP surface: storefront, checkout, provider webhooks and the admin API.

pub mod admin;
pub mod checkout;
pub mod error;
pub mod storefront;
pub mod webhooks;

use crate::application::Services;
use crate::domain::ports::SharedWebhookReceiver;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{delete, get, post, put},
};
use std::time::Duration;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub hubtel_webhook: SharedWebhookReceiver,
    pub paystack_webhook: SharedWebhookReceiver,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard_handler))
        .route(
            "/menu-items",
            get(admin::list_menu_items_handler).post(admin::create_menu_item_handler),
        )
        .route(
            "/menu-items/{id}",
            put(admin::update_menu_item_handler).delete(admin::delete_menu_item_handler),
        )
        .route(
            "/categories",
            get(admin::list_categories_handler).post(admin::create_category_handler),
        )
        .route(
            "/categories/{id}",
            put(admin::rename_category_handler).delete(admin::delete_category_handler),
        )
        .route("/orders", get(admin::list_orders_handler))
        .route("/orders/cancel-stale", post(admin::cancel_stale_orders_handler))
        .route("/orders/{id}/status", put(admin::set_order_status_handler))
        .route("/payments", get(admin::list_payments_handler))
        .route("/customers", get(admin::list_customers_handler))
        .route("/visitors", get(admin::list_visitors_handler))
        .route(
            "/visitors/{id}",
            delete(admin::delete_visitor_handler),
        )
        .route("/messages", get(admin::list_messages_handler))
        .route("/messages/{id}", delete(admin::delete_message_handler))
        .route("/messages/{id}/read", put(admin::set_message_read_handler))
        .route("/ratings", get(admin::list_ratings_handler))
        .route("/ratings/{id}", delete(admin::delete_rating_handler))
        .route(
            "/settings",
            get(admin::get_settings_handler).patch(admin::update_settings_handler),
        )
        .route("/activity", get(admin::activity_handler));

    Router::new()
        .route("/api/menu", get(storefront::menu_handler))
        .route("/api/categories", get(storefront::categories_handler))
        .route("/api/settings", get(storefront::public_settings_handler))
        .route("/api/contact", post(storefront::contact_handler))
        .route("/api/ratings", post(storefront::rating_handler))
        .route("/api/page-views", post(storefront::page_view_handler))
        .route("/api/checkout", post(checkout::checkout_handler))
        .route("/api/hubtel-callback", post(webhooks::hubtel_callback_handler))
        .route("/api/paystack-webhook", post(webhooks::paystack_webhook_handler))
        .nest("/api/admin", admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
