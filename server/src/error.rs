use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::error;
use worldfeel_core::types::{AppConfigError, ServerSecretError, WordError};
use worldfeel_core::{CoreError, StoreError, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Internal(#[from] StoreError),

    #[error("Task failed: {0}")]
    Task(#[from] JoinError),
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(e) => Self::Validation(e),
            CoreError::Store(e) => Self::Internal(e),
        }
    }
}

impl AppError {
    fn label(&self) -> &'static str {
        match self {
            AppError::MalformedPayload => "Malformed payload",
            AppError::Validation(ValidationError::Malformed(_)) => "Invalid word",
            AppError::Validation(ValidationError::NotInVocabulary(_)) => "Unknown emotion",
            AppError::Validation(ValidationError::Profane) => "Inappropriate word",
            AppError::Validation(ValidationError::DeviceToken(_)) => "Invalid device id",
            AppError::Internal(_) | AppError::Task(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MalformedPayload | AppError::Validation(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Internal(_) | AppError::Task(_) => {
                error!("Request failed: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, please try again".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "error": self.label(),
            "message": message,
        });
        (status, Json(body)).into_response()
    }
}

/// Failures that prevent the server from starting.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Config error: {0}")]
    Config(#[from] AppConfigError),

    #[error("No server secret configured (set WORLDFEEL_SECRET)")]
    MissingSecret,

    #[error("Invalid server secret: {0}")]
    InvalidSecret(#[from] ServerSecretError),

    #[error("Invalid vocabulary word: {0}")]
    Vocabulary(#[from] WordError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
