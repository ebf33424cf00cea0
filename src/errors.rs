use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::derive::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Single message returned for both "no such account" and "wrong password",
/// so a caller cannot tell which one happened.
pub const BAD_CREDENTIALS: &str = "Incorrect username or password";

const GENERIC_INTERNAL: &str = "An internal server error occurred";

/// Failures that can only happen while bringing the process up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{0}")]
    Config(&'static str),
    #[error("cannot connect to the database")]
    DbConnect,
    #[error("cannot run database migrations")]
    Migrate,
    #[error("cannot bind to the socket")]
    SocketBind,
    #[error("cannot start the server")]
    ServerStart,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// JSON body used for every non-validation error response.
#[derive(Debug, Clone, Serialize, Deserialize, Display)]
#[display("{message}")]
pub struct ErrorMessage {
    pub message: String,
}

/// Request-level error taxonomy. Every handler and model function funnels
/// into one of these; the client only ever sees the mapped status code and a
/// message, never the underlying database or hashing detail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("database failure")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(&'static str),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(errors) => {
                let fields = errors
                    .iter()
                    .map(|e| (e.field.to_string(), serde_json::Value::from(e.message.clone())))
                    .collect::<serde_json::Map<_, _>>();
                HttpResponse::BadRequest().json(serde_json::json!({
                    "message": "Invalid input",
                    "errors": fields,
                }))
            }
            ApiError::Database(e) => {
                tracing::error!(error = %e, "database failure");
                HttpResponse::InternalServerError().json(ErrorMessage {
                    message: GENERIC_INTERNAL.to_string(),
                })
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal failure: {msg}");
                HttpResponse::InternalServerError().json(ErrorMessage {
                    message: GENERIC_INTERNAL.to_string(),
                })
            }
            other => HttpResponse::build(other.status_code()).json(ErrorMessage {
                message: other.to_string(),
            }),
        }
    }
}

/// Translate a unique-constraint violation into the domain `Conflict`; any
/// other database error stays a 500.
pub fn conflict_on_unique(err: sqlx::Error, message: &'static str) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return ApiError::Conflict(message);
        }
    }
    ApiError::Database(err)
}
