pub mod hubtel;
pub mod in_memory;
pub mod paystack;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;

use crate::error::Result;
use reqwest::Client;
use std::time::Duration;

/// Shared outbound HTTP client for the gateway adapters.
pub fn http_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .use_rustls_tls()
        .timeout(timeout)
        .build()?;
    Ok(client)
}
