use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum RollcallError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Password hash error: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
}

impl RollcallError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        RollcallError::NotFound(format!("{entity} {id} not found"))
    }

    /// Map a unique-constraint violation to `Conflict`, passing other errors through.
    pub fn conflict_on_unique(err: SqlxError, message: &str) -> Self {
        match &err {
            SqlxError::Database(db) if db.is_unique_violation() => {
                RollcallError::Conflict(message.to_string())
            }
            _ => RollcallError::DatabaseError(err),
        }
    }
}

impl IntoResponse for RollcallError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            RollcallError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", msg)
            }
            RollcallError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            RollcallError::Conflict(msg) => (StatusCode::BAD_REQUEST, "CONFLICT", msg),
            RollcallError::Unauthorized(reason) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", reason.to_string())
            }
            RollcallError::Forbidden(reason) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", reason.to_string())
            }
            RollcallError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "request body too large".to_string(),
            ),
            RollcallError::DatabaseError(err) => {
                error!(error = %err, "request failed with database error");
                internal()
            }
            RollcallError::PasswordHash(err) => {
                error!(error = %err, "request failed while hashing a password");
                internal()
            }
        };
        let body = ApiErrorBody {
            code: code.to_string(),
            message,
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal server error occurred.".to_string(),
    )
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
