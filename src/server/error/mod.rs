//! Error types for the hangar server application.
//!
//! Each domain has its own error enum with an `IntoResponse` mapping to an HTTP status and
//! an `ErrorDto` body. Anything without a specific mapping renders as a logged 500 with a
//! generic message so internal details never reach clients.

pub mod auth;
pub mod config;
pub mod integration;
pub mod request;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        auth::AuthError, config::ConfigError, integration::IntegrationError,
        request::RequestError,
    },
};

/// Main error type for the hangar server application.
///
/// Aggregates domain errors and external library errors so handlers and services can use
/// `?` throughout.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication or authorization failure.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Client request could not be fulfilled (missing resource, invalid input, conflict).
    #[error(transparent)]
    RequestError(#[from] RequestError),
    /// Third-party integration failure or misconfiguration.
    #[error(transparent)]
    IntegrationError(#[from] IntegrationError),
    /// Parse error (failed to parse a value from string or other format).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal error indicating a bug in hangar's code.
    #[error("Internal error, this indicates a bug: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] DbErr),
    /// CSV reading or writing error.
    #[error(transparent)]
    CsvError(#[from] csv::Error),
    /// Password hashing error.
    #[error(transparent)]
    PasswordHashError(#[from] bcrypt::BcryptError),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Redis session store error (connection, command execution).
    #[error(transparent)]
    SessionRedisError(#[from] tower_sessions_redis_store::fred::prelude::Error),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// I/O error (binding the listener, serving).
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::RequestError(RequestError::NotFound {
            resource,
            id: id.to_string(),
        })
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::RequestError(RequestError::Validation(message.into()))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::RequestError(RequestError::Conflict(message.into()))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::IntegrationError(IntegrationError::Request(err))
    }
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - Validation failures, bad CSV input, foreign key violations, CSRF mismatch
/// - 401 Unauthorized - No session or invalid credentials
/// - 403 Forbidden - Role does not permit the operation
/// - 404 Not Found - Missing resources
/// - 409 Conflict - Unique constraint violations
/// - 502 / 503 - Upstream provider failure or provider not configured
/// - 500 Internal Server Error - Everything else (with error logging)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::RequestError(err) => err.into_response(),
            Self::IntegrationError(err) => err.into_response(),
            Self::CsvError(err) => {
                tracing::debug!("{}", err);

                error_response(StatusCode::BAD_REQUEST, format!("Invalid CSV: {}", err))
            }
            Self::DbErr(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(detail)) => {
                    tracing::debug!("{}", detail);

                    error_response(
                        StatusCode::CONFLICT,
                        "A record with the same unique value already exists",
                    )
                }
                Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                    tracing::debug!("{}", detail);

                    error_response(StatusCode::BAD_REQUEST, "Referenced record does not exist")
                }
                _ => InternalServerError(err).into_response(),
            },
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Builds a JSON error response with the given status and message.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the full error and returns a generic message to the client.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}
