//! E-signature providers.
//!
//! Each provider sends a contract's document to its signer and later reports progress
//! through a webhook. Webhook payloads are reduced to [`EsignEvent`]s carrying the
//! provider's document id and the contract status it maps to.

pub mod adobe_sign;
pub mod docusign;
pub mod pandadoc;

use entity::sea_orm_active_enums::{ContractStatus, EsignProvider};

use crate::server::{
    config::IntegrationConfig,
    error::{integration::IntegrationError, Error},
    integration::esign::{
        adobe_sign::AdobeSignClient, docusign::DocusignClient, pandadoc::PandadocClient,
    },
    model::db::ContractModel,
};

/// A status change reported by a provider webhook
#[derive(Debug, Clone, PartialEq)]
pub struct EsignEvent {
    pub external_id: String,
    pub status: ContractStatus,
}

/// What a provider needs to send a contract out for signature
pub struct SignatureRequest<'a> {
    pub title: &'a str,
    pub document_url: &'a str,
    pub signer_name: &'a str,
    pub signer_email: &'a str,
}

impl<'a> SignatureRequest<'a> {
    /// Borrows the signing details from a contract.
    ///
    /// Fails validation when the contract has no document or signer email. A missing signer
    /// name falls back to the email address.
    pub fn from_contract(contract: &'a ContractModel) -> Result<Self, Error> {
        let Some(document_url) = contract.document_url.as_deref() else {
            return Err(Error::validation("Contract has no document URL to send"));
        };
        let Some(signer_email) = contract.signer_email.as_deref() else {
            return Err(Error::validation("Contract has no signer email"));
        };

        Ok(Self {
            title: &contract.title,
            document_url,
            signer_name: contract.signer_name.as_deref().unwrap_or(signer_email),
            signer_email,
        })
    }
}

pub enum EsignClient<'a> {
    Docusign(DocusignClient<'a>),
    Pandadoc(PandadocClient<'a>),
    AdobeSign(AdobeSignClient<'a>),
}

impl<'a> EsignClient<'a> {
    pub fn from_config(
        http: &'a reqwest::Client,
        config: &'a IntegrationConfig,
        provider: EsignProvider,
    ) -> Result<Self, Error> {
        let client = match provider {
            EsignProvider::Docusign => config
                .docusign
                .as_ref()
                .map(|c| Self::Docusign(DocusignClient::new(http, c))),
            EsignProvider::Pandadoc => config
                .pandadoc
                .as_ref()
                .map(|c| Self::Pandadoc(PandadocClient::new(http, c))),
            EsignProvider::AdobeSign => config
                .adobe_sign
                .as_ref()
                .map(|c| Self::AdobeSign(AdobeSignClient::new(http, c))),
        };

        client.ok_or_else(|| IntegrationError::NotConfigured(provider_name(provider)).into())
    }

    /// Sends the document for signature, returning the provider's id for it
    pub async fn send(&self, request: &SignatureRequest<'_>) -> Result<String, Error> {
        match self {
            Self::Docusign(client) => client.create_envelope(request).await,
            Self::Pandadoc(client) => client.create_and_send(request).await,
            Self::AdobeSign(client) => client.create_agreement(request).await,
        }
    }
}

pub fn provider_name(provider: EsignProvider) -> &'static str {
    match provider {
        EsignProvider::Docusign => docusign::PROVIDER,
        EsignProvider::Pandadoc => pandadoc::PROVIDER,
        EsignProvider::AdobeSign => adobe_sign::PROVIDER,
    }
}

pub(crate) fn malformed(provider: &'static str, error: serde_json::Error) -> Error {
    IntegrationError::MalformedPayload {
        provider,
        reason: error.to_string(),
    }
    .into()
}
