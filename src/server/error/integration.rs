use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Failures talking to, or receiving calls from, third-party providers.
#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("{0} integration is not configured")]
    NotConfigured(&'static str),
    #[error("Invalid {0} webhook signature")]
    InvalidSignature(&'static str),
    #[error("Malformed {provider} payload: {reason}")]
    MalformedPayload {
        provider: &'static str,
        reason: String,
    },
    #[error("{provider} responded with {status}: {body}")]
    Upstream {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error(transparent)]
    Request(reqwest::Error),
    #[error("{provider} authorization failed: {reason}")]
    OAuth {
        provider: &'static str,
        reason: String,
    },
    #[error("No {0} account is connected")]
    NotConnected(&'static str),
}

impl IntoResponse for IntegrationError {
    fn into_response(self) -> Response {
        match self {
            Self::NotConfigured(_) => {
                tracing::warn!("{}", self);

                error_response(StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            Self::InvalidSignature(_) | Self::MalformedPayload { .. } | Self::NotConnected(_) => {
                tracing::debug!("{}", self);

                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::Upstream { provider, .. } | Self::OAuth { provider, .. } => {
                tracing::error!("{}", self);

                error_response(
                    StatusCode::BAD_GATEWAY,
                    format!("{} request failed", provider),
                )
            }
            Self::Request(_) => {
                tracing::error!("{}", self);

                error_response(StatusCode::BAD_GATEWAY, "Upstream request failed")
            }
        }
    }
}
