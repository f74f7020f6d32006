use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use entity::sea_orm_active_enums::{ContractStatus, EsignProvider, PilotStatus};
use hangar::{
    model::contract::SendContractDto,
    server::{
        config::{IntegrationConfig, PandadocConfig},
        controller::contract::{delete_contract, send_contract},
        integration::Integrations,
        model::app::AppState,
    },
};
use hangar_test_utils::{constant::TEST_APP_URL, prelude::*};

use crate::util::{json_body, response, status, TestContextExt};

fn send_with(provider: EsignProvider) -> Json<SendContractDto> {
    Json(SendContractDto { provider })
}

#[tokio::test]
/// Expect the contract sent through PandaDoc and recorded with the document id
async fn sends_through_pandadoc() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_crm_tables()
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/public/v1/documents")
                .match_header("authorization", "API-Key pd-key")
                .with_status(201)
                .with_body(r#"{"id":"doc-9","status":"document.uploaded"}"#)
                .create()
        })
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/public/v1/documents/doc-9/send")
                .with_status(200)
                .with_body(r#"{"id":"doc-9","status":"document.sent"}"#)
                .create()
        })
        .build()
        .await?;
    let staff = test.user().insert_staff().await?;
    let client = test.crm().insert_client("Acme", None).await?;
    let contract = test
        .crm()
        .insert_contract(client.id, "Master services", ContractStatus::Draft)
        .await?;
    test.login(staff.id).await;
    let state = AppState {
        db: test.db.clone(),
        integrations: Integrations::new(IntegrationConfig {
            pandadoc: Some(PandadocConfig {
                api_key: "pd-key".to_string(),
                webhook_key: None,
                api_url: test.server_url(),
            }),
            ..Default::default()
        })
        .unwrap(),
        app_url: TEST_APP_URL.to_string(),
    };

    let result = send_contract(
        State(state),
        test.session.clone(),
        Path(contract.id),
        send_with(EsignProvider::Pandadoc),
    )
    .await;

    test.assert_mocks();
    let body = json_body(response(result)).await;
    assert_eq!(body["status"], "sent");
    assert_eq!(body["provider"], "pandadoc");
    assert_eq!(body["external_id"], "doc-9");

    Ok(())
}

#[tokio::test]
/// Expect 503 when the chosen provider is not configured
async fn unconfigured_provider() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let client = test.crm().insert_client("Acme", None).await?;
    let contract = test
        .crm()
        .insert_contract(client.id, "Master services", ContractStatus::Draft)
        .await?;
    test.login(staff.id).await;

    let result = send_contract(
        State(test.unconfigured_state()),
        test.session.clone(),
        Path(contract.id),
        send_with(EsignProvider::Docusign),
    )
    .await;

    assert_eq!(status(result), StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}

#[tokio::test]
/// Expect staff allowed and a pilot refused to delete a contract
async fn staff_deletes_contract() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let pilot_user = test.user().insert_pilot_user(pilot.id).await?;
    let client = test.crm().insert_client("Acme", None).await?;
    let contract = test
        .crm()
        .insert_contract(client.id, "Master services", ContractStatus::Draft)
        .await?;

    test.login(pilot_user.id).await;
    let refused =
        delete_contract(State(test.state()), test.session.clone(), Path(contract.id)).await;
    test.login(staff.id).await;
    let deleted =
        delete_contract(State(test.state()), test.session.clone(), Path(contract.id)).await;
    let missing =
        delete_contract(State(test.state()), test.session.clone(), Path(contract.id)).await;

    assert_eq!(status(refused), StatusCode::FORBIDDEN);
    assert_eq!(status(deleted), StatusCode::NO_CONTENT);
    assert_eq!(status(missing), StatusCode::NOT_FOUND);

    Ok(())
}
