use crate::infrastructure::hubtel::{self, HubtelEndpoints};
use crate::infrastructure::paystack::{self, PaystackEndpoints};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Process configuration. Every flag can also come from the environment.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Restaurant ordering and payment service", long_about = None)]
pub struct AppConfig {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Public base URL of the storefront, used to build gateway redirect URLs
    #[arg(long, env = "BASE_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Override for the URL Hubtel posts payment results to
    #[arg(long, env = "HUBTEL_CALLBACK_URL")]
    pub hubtel_callback_url: Option<String>,

    /// Override for where Hubtel sends the customer after paying
    #[arg(long, env = "HUBTEL_RETURN_URL")]
    pub hubtel_return_url: Option<String>,

    /// Override for where Hubtel sends the customer after cancelling
    #[arg(long, env = "HUBTEL_CANCEL_URL")]
    pub hubtel_cancel_url: Option<String>,

    #[arg(long, env = "HUBTEL_API_URL", default_value = hubtel::DEFAULT_API_URL)]
    pub hubtel_api_url: String,

    #[arg(long, env = "PAYSTACK_API_URL", default_value = paystack::DEFAULT_API_URL)]
    pub paystack_api_url: String,

    /// Timeout for outbound gateway calls, in seconds
    #[arg(long, env = "GATEWAY_TIMEOUT_SECS", default_value_t = 30)]
    pub gateway_timeout_secs: u64,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "DB_PATH")]
    pub db_path: Option<PathBuf>,
}

impl AppConfig {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    pub fn order_confirmation_url(&self) -> String {
        self.url("/order-confirmation")
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }

    pub fn hubtel_endpoints(&self) -> HubtelEndpoints {
        HubtelEndpoints {
            api_url: self.hubtel_api_url.clone(),
            callback_url: self
                .hubtel_callback_url
                .clone()
                .unwrap_or_else(|| self.url("/api/hubtel-callback")),
            return_url: self
                .hubtel_return_url
                .clone()
                .unwrap_or_else(|| self.order_confirmation_url()),
            cancellation_url: self
                .hubtel_cancel_url
                .clone()
                .unwrap_or_else(|| self.url("/checkout")),
        }
    }

    pub fn paystack_endpoints(&self) -> PaystackEndpoints {
        PaystackEndpoints {
            api_url: self.paystack_api_url.clone(),
            callback_url: self.order_confirmation_url(),
        }
    }
}
