use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
};
use chrono::{NaiveDate, Utc};
use entity::sea_orm_active_enums::{ContractStatus, EsignProvider, InvoiceStatus};
use hangar::{
    model::webhook::PandadocWebhookParams,
    server::{
        config::{AdobeSignConfig, IntegrationConfig, PandadocConfig},
        controller::webhook::{adobe_sign_verify, pandadoc_webhook, stripe_webhook},
        integration::{signature, Integrations},
        model::app::AppState,
    },
};
use hangar_test_utils::{
    constant::{TEST_APP_URL, TEST_WEBHOOK_SECRET},
    fixtures::provider,
    prelude::*,
};
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, IntoActiveModel};
use serde_json::json;

use crate::util::{json_body, response, status, TestContextExt};

/// State with PandaDoc and Adobe Sign webhooks configured
fn esign_state(test: &TestContext) -> AppState {
    AppState {
        db: test.db.clone(),
        integrations: Integrations::new(IntegrationConfig {
            pandadoc: Some(PandadocConfig {
                api_key: "pd-key".to_string(),
                webhook_key: Some(TEST_WEBHOOK_SECRET.to_string()),
                api_url: test.server_url(),
            }),
            adobe_sign: Some(AdobeSignConfig {
                access_token: "adobe-token".to_string(),
                client_id: "adobe-client".to_string(),
                api_url: test.server_url(),
            }),
            ..Default::default()
        })
        .unwrap(),
        app_url: TEST_APP_URL.to_string(),
    }
}

fn stripe_headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Stripe-Signature", HeaderValue::from_str(value).unwrap());
    headers
}

#[tokio::test]
/// Expect a signed checkout completion to mark the invoice paid
async fn stripe_marks_invoice_paid() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let client = test.crm().insert_client("Acme", None).await?;
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let invoice = test
        .crm()
        .insert_invoice(client.id, "INV-2025-0001", 150_000, InvoiceStatus::Sent, date, date)
        .await?;
    let payload = provider::stripe_checkout_completed(invoice.id, "pi_123").to_string();
    let header =
        signature::stripe_header(TEST_WEBHOOK_SECRET, Utc::now().timestamp(), payload.as_bytes())
            .unwrap();

    let result = stripe_webhook(
        State(test.state()),
        stripe_headers(&header),
        Bytes::from(payload),
    )
    .await;

    assert_eq!(status(result), StatusCode::OK);
    let stored = entity::prelude::Invoice::find_by_id(invoice.id)
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(stored.status, InvoiceStatus::Paid);
    assert!(stored.paid_at.is_some());

    Ok(())
}

#[tokio::test]
/// Expect 400 and no change for a payload signed with the wrong secret
async fn stripe_rejects_bad_signature() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let client = test.crm().insert_client("Acme", None).await?;
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let invoice = test
        .crm()
        .insert_invoice(client.id, "INV-2025-0001", 150_000, InvoiceStatus::Sent, date, date)
        .await?;
    let payload = provider::stripe_checkout_completed(invoice.id, "pi_123").to_string();
    let header =
        signature::stripe_header("whsec_other", Utc::now().timestamp(), payload.as_bytes())
            .unwrap();

    let result = stripe_webhook(
        State(test.state()),
        stripe_headers(&header),
        Bytes::from(payload),
    )
    .await;

    assert_eq!(status(result), StatusCode::BAD_REQUEST);
    let stored = entity::prelude::Invoice::find_by_id(invoice.id)
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(stored.status, InvoiceStatus::Sent);

    Ok(())
}

#[tokio::test]
/// Expect a signed PandaDoc completion to mark the matching contract signed
async fn pandadoc_signs_contract() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let client = test.crm().insert_client("Acme", None).await?;
    let contract = test
        .crm()
        .insert_contract(client.id, "Master services", ContractStatus::Sent)
        .await?;
    let mut sent = contract.into_active_model();
    sent.provider = ActiveValue::Set(Some(EsignProvider::Pandadoc));
    sent.external_id = ActiveValue::Set(Some("doc-9".to_string()));
    let contract = sent.update(&test.db).await?;

    let payload = json!([
        {
            "event": "document_state_changed",
            "data": { "id": "doc-9", "status": "document.completed" }
        },
        {
            "event": "document_state_changed",
            "data": { "id": "doc-unknown", "status": "document.completed" }
        }
    ])
    .to_string();
    let signed = signature::sign_hex(TEST_WEBHOOK_SECRET, payload.as_bytes()).unwrap();

    let result = pandadoc_webhook(
        State(esign_state(&test)),
        Query(PandadocWebhookParams {
            signature: Some(signed),
        }),
        Bytes::from(payload),
    )
    .await;

    assert_eq!(json_body(response(result)).await["applied"], 1);
    let stored = entity::prelude::Contract::find_by_id(contract.id)
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(stored.status, ContractStatus::Signed);

    Ok(())
}

#[tokio::test]
/// Expect 400 for a PandaDoc delivery without a signature
async fn pandadoc_requires_signature() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;

    let result = pandadoc_webhook(
        State(esign_state(&test)),
        Query(PandadocWebhookParams { signature: None }),
        Bytes::from_static(b"[]"),
    )
    .await;

    assert_eq!(status(result), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
/// Expect Adobe Sign's verification request answered with its client id echoed
async fn adobe_sign_echoes_client_id() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let mut headers = HeaderMap::new();
    headers.insert("X-AdobeSign-ClientId", HeaderValue::from_static("adobe-client"));

    let result = adobe_sign_verify(State(esign_state(&test)), headers).await;

    let resp = response(result);
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("X-AdobeSign-ClientId")
            .and_then(|v| v.to_str().ok()),
        Some("adobe-client")
    );

    Ok(())
}
