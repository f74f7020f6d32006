use entity::sea_orm_active_enums::ContractStatus;
use serde::Deserialize;
use serde_json::json;

use crate::server::{
    config::PandadocConfig,
    error::Error,
    integration::{
        check_status,
        esign::{malformed, EsignEvent, SignatureRequest},
        read_json,
    },
};

pub const PROVIDER: &str = "PandaDoc";

pub struct PandadocClient<'a> {
    http: &'a reqwest::Client,
    config: &'a PandadocConfig,
}

#[derive(Deserialize)]
struct DocumentSummary {
    id: String,
}

#[derive(Deserialize)]
struct WebhookEvent {
    event: String,
    data: WebhookDocument,
}

#[derive(Deserialize)]
struct WebhookDocument {
    id: String,
    status: Option<String>,
}

impl<'a> PandadocClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a PandadocConfig) -> Self {
        Self { http, config }
    }

    fn authorization(&self) -> String {
        format!("API-Key {}", self.config.api_key)
    }

    /// Creates a document from the remote file and sends it to the signer
    pub async fn create_and_send(&self, request: &SignatureRequest<'_>) -> Result<String, Error> {
        let body = json!({
            "name": request.title,
            "url": request.document_url,
            "parse_form_fields": false,
            "recipients": [{
                "email": request.signer_email,
                "first_name": request.signer_name,
                "role": "Signer",
            }],
        });

        let response = self
            .http
            .post(format!("{}/public/v1/documents", self.config.api_url))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .json(&body)
            .send()
            .await?;
        let response = check_status(PROVIDER, response).await?;
        let document: DocumentSummary = read_json(PROVIDER, response).await?;

        let response = self
            .http
            .post(format!(
                "{}/public/v1/documents/{}/send",
                self.config.api_url, document.id
            ))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .json(&json!({
                "subject": format!("Please sign: {}", request.title),
                "silent": false,
            }))
            .send()
            .await?;
        check_status(PROVIDER, response).await?;

        Ok(document.id)
    }
}

/// Parses a webhook delivery, which batches one or more events.
pub fn parse_webhook(payload: &[u8]) -> Result<Vec<EsignEvent>, Error> {
    let events: Vec<WebhookEvent> =
        serde_json::from_slice(payload).map_err(|e| malformed(PROVIDER, e))?;

    Ok(events
        .into_iter()
        .filter(|event| event.event == "document_state_changed")
        .filter_map(|event| {
            let status = map_status(event.data.status.as_deref()?)?;

            Some(EsignEvent {
                external_id: event.data.id,
                status,
            })
        })
        .collect())
}

fn map_status(status: &str) -> Option<ContractStatus> {
    match status {
        "document.sent" => Some(ContractStatus::Sent),
        "document.viewed" => Some(ContractStatus::Viewed),
        "document.completed" => Some(ContractStatus::Signed),
        "document.declined" => Some(ContractStatus::Declined),
        "document.voided" | "document.expired" => Some(ContractStatus::Expired),
        _ => None,
    }
}
