use entity::sea_orm_active_enums::ContractStatus;
use serde::Deserialize;
use serde_json::json;

use crate::server::{
    config::AdobeSignConfig,
    error::Error,
    integration::{
        check_status,
        esign::{malformed, EsignEvent, SignatureRequest},
        read_json,
    },
};

pub const PROVIDER: &str = "Adobe Sign";

/// Header Adobe Sign uses to identify the application, echoed back on every webhook response
pub const CLIENT_ID_HEADER: &str = "X-AdobeSign-ClientId";

pub struct AdobeSignClient<'a> {
    http: &'a reqwest::Client,
    config: &'a AdobeSignConfig,
}

#[derive(Deserialize)]
struct AgreementCreation {
    id: String,
}

#[derive(Deserialize)]
struct WebhookNotification {
    event: String,
    agreement: Option<AgreementInfo>,
}

#[derive(Deserialize)]
struct AgreementInfo {
    id: String,
}

impl<'a> AdobeSignClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a AdobeSignConfig) -> Self {
        Self { http, config }
    }

    /// Creates an agreement in process from a remote PDF
    pub async fn create_agreement(&self, request: &SignatureRequest<'_>) -> Result<String, Error> {
        let body = json!({
            "name": request.title,
            "fileInfos": [{
                "urlFileInfo": {
                    "url": request.document_url,
                    "name": request.title,
                    "mimeType": "application/pdf",
                }
            }],
            "participantSetsInfo": [{
                "order": 1,
                "role": "SIGNER",
                "memberInfos": [{ "email": request.signer_email }],
            }],
            "signatureType": "ESIGN",
            "state": "IN_PROCESS",
        });

        let response = self
            .http
            .post(format!("{}/agreements", self.config.api_url))
            .bearer_auth(&self.config.access_token)
            .json(&body)
            .send()
            .await?;
        let response = check_status(PROVIDER, response).await?;
        let agreement: AgreementCreation = read_json(PROVIDER, response).await?;

        Ok(agreement.id)
    }
}

pub fn parse_webhook(payload: &[u8]) -> Result<Vec<EsignEvent>, Error> {
    let notification: WebhookNotification =
        serde_json::from_slice(payload).map_err(|e| malformed(PROVIDER, e))?;

    let event = match (map_status(&notification.event), notification.agreement) {
        (Some(status), Some(agreement)) => Some(EsignEvent {
            external_id: agreement.id,
            status,
        }),
        _ => None,
    };

    Ok(event.into_iter().collect())
}

fn map_status(event: &str) -> Option<ContractStatus> {
    match event {
        "AGREEMENT_ACTION_REQUESTED" => Some(ContractStatus::Sent),
        "AGREEMENT_EMAIL_VIEWED" => Some(ContractStatus::Viewed),
        "AGREEMENT_WORKFLOW_COMPLETED" => Some(ContractStatus::Signed),
        "AGREEMENT_REJECTED" => Some(ContractStatus::Declined),
        "AGREEMENT_EXPIRED" | "AGREEMENT_RECALLED" => Some(ContractStatus::Expired),
        _ => None,
    }
}
