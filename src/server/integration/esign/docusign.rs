use entity::sea_orm_active_enums::ContractStatus;
use serde::Deserialize;
use serde_json::json;

use crate::server::{
    config::DocusignConfig,
    error::Error,
    integration::{
        check_status,
        esign::{malformed, EsignEvent, SignatureRequest},
        read_json,
    },
};

pub const PROVIDER: &str = "DocuSign";

pub struct DocusignClient<'a> {
    http: &'a reqwest::Client,
    config: &'a DocusignConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeSummary {
    envelope_id: String,
}

/// DocuSign Connect notification in JSON format
#[derive(Deserialize)]
struct ConnectEvent {
    event: String,
    data: ConnectEventData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectEventData {
    envelope_id: String,
}

impl<'a> DocusignClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a DocusignConfig) -> Self {
        Self { http, config }
    }

    /// Creates and immediately sends an envelope with a single remote document
    pub async fn create_envelope(&self, request: &SignatureRequest<'_>) -> Result<String, Error> {
        let body = json!({
            "emailSubject": format!("Please sign: {}", request.title),
            "documents": [{
                "documentId": "1",
                "name": request.title,
                "remoteUrl": request.document_url,
            }],
            "recipients": {
                "signers": [{
                    "recipientId": "1",
                    "routingOrder": "1",
                    "name": request.signer_name,
                    "email": request.signer_email,
                }]
            },
            "status": "sent",
        });

        let response = self
            .http
            .post(format!(
                "{}/v2.1/accounts/{}/envelopes",
                self.config.api_url, self.config.account_id
            ))
            .bearer_auth(&self.config.access_token)
            .json(&body)
            .send()
            .await?;
        let response = check_status(PROVIDER, response).await?;
        let envelope: EnvelopeSummary = read_json(PROVIDER, response).await?;

        Ok(envelope.envelope_id)
    }
}

/// Parses a Connect notification. Events without a contract status are dropped.
pub fn parse_webhook(payload: &[u8]) -> Result<Vec<EsignEvent>, Error> {
    let event: ConnectEvent =
        serde_json::from_slice(payload).map_err(|e| malformed(PROVIDER, e))?;

    Ok(map_status(&event.event)
        .map(|status| EsignEvent {
            external_id: event.data.envelope_id,
            status,
        })
        .into_iter()
        .collect())
}

fn map_status(event: &str) -> Option<ContractStatus> {
    match event {
        "envelope-sent" => Some(ContractStatus::Sent),
        "envelope-delivered" => Some(ContractStatus::Viewed),
        "envelope-completed" => Some(ContractStatus::Signed),
        "envelope-declined" => Some(ContractStatus::Declined),
        "envelope-voided" => Some(ContractStatus::Expired),
        _ => None,
    }
}
