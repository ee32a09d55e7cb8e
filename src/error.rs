use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Gateway configuration error: {0}")]
    GatewayConfigError(String),
    #[error("{0}")]
    GatewayError(String),
    #[error("Webhook signature verification failed")]
    Unauthorized,
    #[error("Reconciliation error: {0}")]
    ReconciliationError(String),
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Database error: {0}")]
    DatabaseError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, AppError>;
