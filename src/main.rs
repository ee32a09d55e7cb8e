use bitecraft::application::Services;
use bitecraft::config::AppConfig;
use bitecraft::domain::ports::{PaymentGateways, SharedWebhookReceiver, Stores};
use bitecraft::infrastructure::hubtel::HubtelGateway;
use bitecraft::infrastructure::in_memory::InMemoryStore;
use bitecraft::infrastructure::paystack::PaystackGateway;
use bitecraft::infrastructure::http_client;
use bitecraft::interfaces::http::{AppState, router, shutdown_signal};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

fn open_stores(config: &AppConfig) -> Result<Stores> {
    match &config.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => {
            // Use persistent storage (RocksDB)
            let store = bitecraft::infrastructure::rocksdb::RocksDBStore::open(db_path).into_diagnostic()?;
            info!(path = %db_path.display(), "Using RocksDB storage");
            Ok(Stores::from_backend(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(db_path) => {
            tracing::warn!(
                path = %db_path.display(),
                "Built without the storage-rocksdb feature; falling back to in-memory storage"
            );
            Ok(Stores::from_backend(InMemoryStore::new()))
        }
        None => Ok(Stores::from_backend(InMemoryStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::parse();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let stores = open_stores(&config)?;

    let http = http_client(config.gateway_timeout()).into_diagnostic()?;
    let hubtel = Arc::new(HubtelGateway::new(
        http.clone(),
        stores.settings.clone(),
        config.hubtel_endpoints(),
    ));
    let paystack = Arc::new(PaystackGateway::new(
        http,
        stores.settings.clone(),
        config.paystack_endpoints(),
    ));

    let hubtel_webhook: SharedWebhookReceiver = hubtel.clone();
    let paystack_webhook: SharedWebhookReceiver = paystack.clone();
    let state = AppState {
        services: Services::new(stores, PaymentGateways::new(hubtel, paystack)),
        hubtel_webhook,
        paystack_webhook,
    };

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await.into_diagnostic()?;
    info!(%address, base_url = %config.base_url, "Server running");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .into_diagnostic()?;

    info!("Server stopped");
    Ok(())
}
