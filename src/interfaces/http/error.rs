use crate::error::AppError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

const GENERIC_FAILURE: &str = "An unexpected error occurred. Please try again.";

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::GatewayError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show a client. Unexpected failures collapse to a generic message.
    fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::GatewayConfigError(msg)
            | AppError::GatewayError(msg) => msg.clone(),
            AppError::NotFound(_)
            | AppError::Unauthorized
            | AppError::MalformedPayload(_)
            | AppError::ReconciliationError(_) => self.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, %status, "Request failed");
        }
        let body = json!({ "error": true, "message": self.public_message() });
        (status, Json(body)).into_response()
    }
}
