use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::MessageResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone()),
        };

        let body = Json(MessageResponse::new(message));

        (status, body).into_response()
    }
}

/// Convert database errors to more specific AppError with user-friendly messages
pub fn from_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique constraint violation (PostgreSQL error code 23505)
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            if let Some(constraint) = db_err.constraint() {
                if constraint.contains("categories_slug") {
                    return AppError::Conflict(
                        "A category with this slug already exists.".to_string(),
                    );
                }
                if constraint.contains("posts_slug") {
                    return AppError::Conflict("A post with this slug already exists.".to_string());
                }
            }
            return AppError::Conflict("A record with this value already exists.".to_string());
        }

        // Foreign key violation (PostgreSQL error code 23503)
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23503")) {
            return AppError::BadRequest("Referenced record does not exist.".to_string());
        }
    }

    AppError::Database(e)
}

/// True when the error is a Postgres unique constraint violation (23505).
/// The slug allocators use this to detect a lost insert race and retry.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        return db_err.code() == Some(std::borrow::Cow::Borrowed("23505"));
    }
    false
}

pub type Result<T> = std::result::Result<T, AppError>;
