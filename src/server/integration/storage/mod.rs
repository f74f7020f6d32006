//! Cloud storage providers connected per user over OAuth2.

pub mod google_drive;
pub mod onedrive;

use chrono::Utc;
use entity::sea_orm_active_enums::StorageProvider;
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
};

use crate::{
    model::storage::StorageFileDto,
    server::{
        config::{IntegrationConfig, OAuthAppConfig},
        data::storage::StorageTokens,
        error::{integration::IntegrationError, Error},
    },
};

type OAuthClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

pub struct StorageClient<'a> {
    provider: StorageProvider,
    http: &'a reqwest::Client,
    oauth_http: &'a oauth2::reqwest::Client,
    config: &'a OAuthAppConfig,
}

/// A file to store, read fully into memory
pub struct Upload<'a> {
    pub folder: Option<&'a str>,
    pub name: &'a str,
    pub content_type: &'a str,
    pub body: Vec<u8>,
}

pub fn provider_name(provider: StorageProvider) -> &'static str {
    match provider {
        StorageProvider::GoogleDrive => google_drive::PROVIDER,
        StorageProvider::Onedrive => onedrive::PROVIDER,
    }
}

/// Path segment used for a provider in connect and callback URLs
pub fn provider_slug(provider: StorageProvider) -> &'static str {
    match provider {
        StorageProvider::GoogleDrive => "google_drive",
        StorageProvider::Onedrive => "onedrive",
    }
}

impl<'a> StorageClient<'a> {
    pub fn from_config(
        http: &'a reqwest::Client,
        oauth_http: &'a oauth2::reqwest::Client,
        config: &'a IntegrationConfig,
        provider: StorageProvider,
    ) -> Result<Self, Error> {
        let app = match provider {
            StorageProvider::GoogleDrive => config.google_drive.as_ref(),
            StorageProvider::Onedrive => config.onedrive.as_ref(),
        };
        let config = app.ok_or(IntegrationError::NotConfigured(provider_name(provider)))?;

        Ok(Self {
            provider,
            http,
            oauth_http,
            config,
        })
    }

    pub fn provider(&self) -> StorageProvider {
        self.provider
    }

    fn oauth_error(&self, reason: impl ToString) -> Error {
        IntegrationError::OAuth {
            provider: provider_name(self.provider),
            reason: reason.to_string(),
        }
        .into()
    }

    fn oauth_client(&self, redirect_uri: Option<&str>) -> Result<OAuthClient, Error> {
        let client = BasicClient::new(ClientId::new(self.config.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.config.client_secret.clone()))
            .set_auth_uri(
                AuthUrl::new(self.config.auth_url.clone()).map_err(|e| self.oauth_error(e))?,
            )
            .set_token_uri(
                TokenUrl::new(self.config.token_url.clone()).map_err(|e| self.oauth_error(e))?,
            );

        match redirect_uri {
            Some(uri) => Ok(client.set_redirect_uri(
                RedirectUrl::new(uri.to_string()).map_err(|e| self.oauth_error(e))?,
            )),
            None => Ok(client),
        }
    }

    /// Builds the consent URL, returning it with the CSRF state to keep in the session
    pub fn authorize_url(&self, redirect_uri: &str) -> Result<(String, String), Error> {
        let client = self.oauth_client(Some(redirect_uri))?;

        let mut request = client.authorize_url(CsrfToken::new_random);
        for scope in self.scopes() {
            request = request.add_scope(Scope::new(scope.to_string()));
        }
        if self.provider == StorageProvider::GoogleDrive {
            // Google only issues a refresh token for offline access with explicit consent
            request = request
                .add_extra_param("access_type", "offline")
                .add_extra_param("prompt", "consent");
        }
        let (url, state) = request.url();

        Ok((url.to_string(), state.secret().clone()))
    }

    fn scopes(&self) -> &'static [&'static str] {
        match self.provider {
            StorageProvider::GoogleDrive => google_drive::SCOPES,
            StorageProvider::Onedrive => onedrive::SCOPES,
        }
    }

    /// Exchanges the callback's authorization code for tokens
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<StorageTokens, Error> {
        let token = self
            .oauth_client(Some(redirect_uri))?
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(self.oauth_http)
            .await
            .map_err(|e| self.oauth_error(e))?;

        Ok(into_tokens(&token))
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<StorageTokens, Error> {
        let token = self
            .oauth_client(None)?
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(self.oauth_http)
            .await
            .map_err(|e| self.oauth_error(e))?;

        Ok(into_tokens(&token))
    }

    pub async fn list_files(
        &self,
        access_token: &str,
        folder: Option<&str>,
    ) -> Result<Vec<StorageFileDto>, Error> {
        match self.provider {
            StorageProvider::GoogleDrive => {
                google_drive::list_files(self.http, &self.config.api_url, access_token, folder)
                    .await
            }
            StorageProvider::Onedrive => {
                onedrive::list_files(self.http, &self.config.api_url, access_token, folder).await
            }
        }
    }

    pub async fn upload(
        &self,
        access_token: &str,
        upload: Upload<'_>,
    ) -> Result<StorageFileDto, Error> {
        match self.provider {
            StorageProvider::GoogleDrive => {
                google_drive::upload(self.http, &self.config.api_url, access_token, upload).await
            }
            StorageProvider::Onedrive => {
                onedrive::upload(self.http, &self.config.api_url, access_token, upload).await
            }
        }
    }
}

fn into_tokens(token: &impl TokenResponse) -> StorageTokens {
    let expires_at = token
        .expires_in()
        .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
        .map(|ttl| Utc::now().naive_utc() + ttl);

    StorageTokens {
        access_token: token.access_token().secret().clone(),
        refresh_token: token.refresh_token().map(|t| t.secret().clone()),
        expires_at,
    }
}
