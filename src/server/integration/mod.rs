//! Clients for third-party providers.
//!
//! Every provider is optional. [`Integrations`] holds the shared HTTP clients and the
//! provider configuration, and hands out a provider client only when that provider is
//! configured, failing with [`IntegrationError::NotConfigured`] otherwise.

pub mod esign;
pub mod notify;
pub mod signature;
pub mod storage;
pub mod stripe;

use std::{sync::Arc, time::Duration};

use entity::sea_orm_active_enums::{EsignProvider, StorageProvider};

use crate::server::{
    config::IntegrationConfig,
    error::{integration::IntegrationError, Error},
    integration::{
        esign::EsignClient, notify::Notifier, storage::StorageClient, stripe::StripeClient,
    },
};

static USER_AGENT: &str = concat!("hangar/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct Integrations {
    http: reqwest::Client,
    /// Client used for OAuth token requests, never follows redirects
    oauth_http: oauth2::reqwest::Client,
    config: Arc<IntegrationConfig>,
}

impl Integrations {
    pub fn new(config: IntegrationConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let oauth_http = oauth2::reqwest::ClientBuilder::new()
            .redirect(oauth2::reqwest::redirect::Policy::none())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IntegrationError::OAuth {
                provider: "OAuth",
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            oauth_http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    pub fn stripe(&self) -> Result<StripeClient<'_>, Error> {
        let config = self
            .config
            .stripe
            .as_ref()
            .ok_or(IntegrationError::NotConfigured("Stripe"))?;

        Ok(StripeClient::new(&self.http, config))
    }

    pub fn esign(&self, provider: EsignProvider) -> Result<EsignClient<'_>, Error> {
        EsignClient::from_config(&self.http, &self.config, provider)
    }

    pub fn storage(&self, provider: StorageProvider) -> Result<StorageClient<'_>, Error> {
        StorageClient::from_config(&self.http, &self.oauth_http, &self.config, provider)
    }

    /// Returns an owned notifier which can be moved into spawned tasks
    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.http.clone(), self.config.clone())
    }
}

/// Turns a non-success response into [`IntegrationError::Upstream`] carrying the body
pub(crate) async fn check_status(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(IntegrationError::Upstream {
        provider,
        status: status.as_u16(),
        body,
    }
    .into())
}

/// Reads a JSON body, reporting shape mismatches as a malformed provider payload
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T, Error> {
    let bytes = response.bytes().await?;

    serde_json::from_slice(&bytes).map_err(|e| {
        IntegrationError::MalformedPayload {
            provider,
            reason: e.to_string(),
        }
        .into()
    })
}
