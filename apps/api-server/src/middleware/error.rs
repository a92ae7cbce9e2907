//! Error handling - maps failures to status codes and `ErrorResponse` bodies.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::PostError;
use quill_shared::ErrorResponse;

/// Application-level error type returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation errors: {0:?}")]
    Validation(Vec<String>),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// `detail` is only rendered when `expose` is set.
    #[error("Internal error: {detail}")]
    Internal { detail: String, expose: bool },
}

impl AppError {
    pub fn from_post_error(err: PostError, expose: bool) -> Self {
        match err {
            PostError::Validation { errors } => AppError::Validation(errors),
            PostError::Conflict { post_id } => {
                AppError::Conflict(format!("post {post_id} already exists"))
            }
            PostError::Store(e) => AppError::Internal {
                detail: e.to_string(),
                expose,
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            AppError::Validation(errors) => ErrorResponse::validation(errors.clone()),
            AppError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                ErrorResponse::conflict()
            }
            AppError::Internal { detail, expose } => {
                tracing::error!("Internal error: {}", detail);
                let body = ErrorResponse::internal_error();
                if *expose {
                    body.with_detail(detail.clone())
                } else {
                    body
                }
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
