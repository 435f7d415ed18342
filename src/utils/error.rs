use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::repository::RepositoryError;
use crate::utils::response::error as error_response;

pub const USER_NOT_FOUND: &str = "User not found";
pub const INVALID_USER_ID: &str = "Invalid user ID";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// `message` is what the client sees; `source` is only logged.
    #[error("{message}")]
    Persistence {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl AppError {
    /// Translates a repository failure, using `message` as the public text for
    /// anything that is not a missing row.
    pub fn from_repository(err: RepositoryError, message: &'static str) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound(USER_NOT_FOUND.to_string()),
            source @ (RepositoryError::Persistence(_) | RepositoryError::DeadlineExceeded(_)) => {
                AppError::Persistence { message, source }
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg) => {
                warn!(message = %msg, "Invalid request");
            }
            AppError::NotFound(msg) => {
                warn!(message = %msg, "Resource not found");
            }
            AppError::Persistence { message, source } => {
                error!(
                    error = ?source,
                    unique_violation = source.is_unique_violation(),
                    "{}",
                    message
                );
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        self.log();

        // Storage errors never reach the client verbatim
        let public_message = match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => msg,
            AppError::Persistence { message, .. } => message.to_string(),
        };

        error_response(public_message, status)
    }
}
