//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use vault_core::VaultError;

/// Errors returned by the HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body could not be read as an insert request
    #[error("{0}")]
    BadRequest(String),

    /// Missing `text_id` or unreadable credentials on a get
    #[error("{0}")]
    NotAcceptable(String),

    #[error(transparent)]
    Vault(#[from] VaultError),
}

impl ApiError {
    /// Status code and client-facing message
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotAcceptable(msg) => (StatusCode::NOT_ACCEPTABLE, msg.clone()),
            Self::Vault(err) => {
                let status = match err {
                    VaultError::ValidationFailed(_)
                    | VaultError::PasswordRequired
                    | VaultError::PrivateKeyRequired => StatusCode::BAD_REQUEST,
                    VaultError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    VaultError::NotFound(_) => StatusCode::NOT_FOUND,
                    e if e.is_credential_failure() => StatusCode::UNPROCESSABLE_ENTITY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };

                let message = if err.is_credential_failure() {
                    VaultError::DecryptionFailed.to_string()
                } else if status.is_server_error() {
                    "internal server error".to_string()
                } else {
                    err.to_string()
                };

                (status, message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
