use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::analytics::Overflow;
use crate::backend::response::Envelope;

#[derive(Error, Debug)]
pub enum AppError {
    /// Field-level constraint violations, already joined into one message.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    /// Missing, malformed id, or owned by someone else.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Not authorized to access this route")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Duplicate(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Database(_) | AppError::Internal(_) => {
                error!(error = %self, "request failed");
                "Server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(Envelope::<()>::failure(message))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<Overflow> for AppError {
    fn from(overflow: Overflow) -> Self {
        AppError::Internal(overflow.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
