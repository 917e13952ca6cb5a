use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::database::StoreError;
use crate::result::ExecuteResponse;

pub type AppResult<T> = Result<T, AppError>;

/// Every failure a service can report. The transport edge turns it into a
/// `{statusCode, message}` envelope exactly once.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    /// A public identifier did not resolve. Reported with 409, not 404.
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("status code {0} is not seeded")]
    StatusNotSeeded(String),
    #[error("store error: {0}")]
    Store(StoreError),
    #[error("token store error: {0}")]
    Cache(#[from] redis::RedisError),
    #[error("token encoding error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict(message) => AppError::Conflict(message),
            other => AppError::Store(other),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::StatusNotSeeded(_)
            | AppError::Store(_)
            | AppError::Cache(_)
            | AppError::Token(_)
            | AppError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized(message)
            | AppError::Forbidden(message)
            | AppError::NotFound(message)
            | AppError::Conflict(message)
            | AppError::Validation(message) => message.clone(),
            AppError::StatusNotSeeded(code) => format!("Status {code} is not configured."),
            _ => "Internal server error.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }

        let body = Json(ExecuteResponse::new(status, self.public_message()));

        (status, body).into_response()
    }
}
