use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
};
use entity::sea_orm_active_enums::StorageProvider;
use hangar::{
    model::storage::{StorageCallbackParams, StorageFilesParams},
    server::{
        config::{IntegrationConfig, OAuthAppConfig},
        controller::storage::{connect_storage, list_storage_files, storage_callback},
        integration::Integrations,
        model::app::AppState,
    },
};
use hangar_test_utils::{constant::TEST_APP_URL, fixtures::provider, prelude::*};
use serde_json::json;

use crate::util::{json_body, response, status, TestContextExt};

/// State with Google Drive pointed at the mock server
fn drive_state(test: &TestContext) -> AppState {
    let url = test.server_url();

    AppState {
        db: test.db.clone(),
        integrations: Integrations::new(IntegrationConfig {
            google_drive: Some(OAuthAppConfig {
                client_id: "drive-client".to_string(),
                client_secret: "drive-secret".to_string(),
                auth_url: format!("{}/o/oauth2/auth", url),
                token_url: format!("{}/token", url),
                api_url: url,
            }),
            ..Default::default()
        })
        .unwrap(),
        app_url: TEST_APP_URL.to_string(),
    }
}

fn location(resp: &Response) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
/// Expect the consent redirect, then the callback storing tokens and a file listing with them
async fn connects_and_lists() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_crm_tables()
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/token")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(provider::oauth_token("drive-access", Some("drive-refresh")).to_string())
                .create()
        })
        .with_mock_endpoint(|server| {
            server
                .mock("GET", "/drive/v3/files")
                .match_query(mockito::Matcher::Any)
                .match_header("authorization", "Bearer drive-access")
                .with_status(200)
                .with_body(
                    json!({
                        "files": [{
                            "id": "f1",
                            "name": "site-plan.pdf",
                            "mimeType": "application/pdf",
                            "size": "2048",
                            "webViewLink": "https://drive.example.com/f1",
                        }]
                    })
                    .to_string(),
                )
                .create()
        })
        .build()
        .await?;
    let staff = test.user().insert_staff().await?;
    test.login(staff.id).await;

    let connect = connect_storage(
        State(drive_state(&test)),
        test.session.clone(),
        Path(StorageProvider::GoogleDrive),
    )
    .await;
    let connect = response(connect);
    assert_eq!(connect.status(), StatusCode::TEMPORARY_REDIRECT);
    let consent = location(&connect);
    assert!(consent.starts_with(&format!("{}/o/oauth2/auth", test.server_url())));
    assert!(consent.contains("access_type=offline"));
    let csrf_state = consent
        .split(['?', '&'])
        .find_map(|pair| pair.strip_prefix("state="))
        .unwrap_or_default()
        .to_string();

    let callback = storage_callback(
        State(drive_state(&test)),
        test.session.clone(),
        Path(StorageProvider::GoogleDrive),
        Query(StorageCallbackParams {
            code: "auth-code".to_string(),
            state: csrf_state,
        }),
    )
    .await;
    let callback = response(callback);
    assert_eq!(
        location(&callback),
        format!("{}/settings?storage=google_drive", TEST_APP_URL)
    );

    let files = list_storage_files(
        State(drive_state(&test)),
        test.session.clone(),
        Path(StorageProvider::GoogleDrive),
        Query(StorageFilesParams::default()),
    )
    .await;

    test.assert_mocks();
    let files = json_body(response(files)).await;
    assert_eq!(files[0]["name"], "site-plan.pdf");
    assert_eq!(files[0]["size"], 2048);

    Ok(())
}

#[tokio::test]
/// Expect 400 for a callback whose state was never issued
async fn callback_without_state() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    test.login(staff.id).await;

    let result = storage_callback(
        State(drive_state(&test)),
        test.session.clone(),
        Path(StorageProvider::GoogleDrive),
        Query(StorageCallbackParams {
            code: "auth-code".to_string(),
            state: "forged".to_string(),
        }),
    )
    .await;

    assert_eq!(status(result), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
/// Expect 503 when the provider has no app configured
async fn unconfigured_provider() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    test.login(staff.id).await;

    let result = connect_storage(
        State(test.unconfigured_state()),
        test.session.clone(),
        Path(StorageProvider::Onedrive),
    )
    .await;

    assert_eq!(status(result), StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}

#[tokio::test]
/// Expect 400 listing files before an account is connected
async fn list_without_connection() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    test.login(staff.id).await;

    let result = list_storage_files(
        State(drive_state(&test)),
        test.session.clone(),
        Path(StorageProvider::GoogleDrive),
        Query(StorageFilesParams::default()),
    )
    .await;

    assert_eq!(status(result), StatusCode::BAD_REQUEST);

    Ok(())
}
