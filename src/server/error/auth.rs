use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::{error_response, InternalServerError};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User ID is not present in session")]
    UserNotInSession,
    #[error("User ID {0:?} not found in database despite having an active session")]
    UserNotInDatabase(i32),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User role is not permitted to perform this operation")]
    Forbidden,
    #[error("Failed to complete authorization due to CSRF state mismatch")]
    CsrfValidationFailed,
    #[error("CSRF state present in session store but without a value")]
    CsrfMissingValue,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::UserNotInSession => {
                tracing::debug!("{}", self);

                error_response(StatusCode::UNAUTHORIZED, "Not logged in")
            }
            Self::UserNotInDatabase(user_id) => {
                tracing::debug!(user_id = %user_id, "{}", self);

                error_response(StatusCode::UNAUTHORIZED, "Not logged in")
            }
            Self::InvalidCredentials => {
                tracing::debug!("{}", self);

                error_response(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            Self::Forbidden => {
                tracing::debug!("{}", self);

                error_response(StatusCode::FORBIDDEN, "Forbidden")
            }
            Self::CsrfValidationFailed => {
                tracing::debug!("{}", self);

                error_response(
                    StatusCode::BAD_REQUEST,
                    "There was an issue connecting your account, please try again.",
                )
            }
            Self::CsrfMissingValue => InternalServerError(self).into_response(),
        }
    }
}
