use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Errors caused by the request itself rather than the server.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let status = match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        error_response(status, self.to_string())
    }
}
