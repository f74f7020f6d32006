use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    Json,
};
use chrono::NaiveDate;
use entity::sea_orm_active_enums::InvoiceStatus;
use hangar::{
    model::client::{ClientListParams, CreateClientDto},
    server::controller::client::{
        create_client, delete_client, export_clients, get_client, import_clients, list_clients,
    },
};
use hangar_test_utils::prelude::*;

use crate::util::{json_body, response, status, TestContextExt};

#[tokio::test]
/// Expect 201 with a normalized email, then the client found by search
async fn staff_create_and_search() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    test.login(staff.id).await;

    let created = create_client(
        State(test.state()),
        test.session.clone(),
        Json(CreateClientDto {
            name: "Acme Surveying".to_string(),
            email: Some(" AP@Acme.test ".to_string()),
            ..Default::default()
        }),
    )
    .await;
    let created = response(created);
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(json_body(created).await["email"], "ap@acme.test");

    let found = list_clients(
        State(test.state()),
        test.session.clone(),
        Query(ClientListParams {
            search: Some("acme".to_string()),
        }),
    )
    .await;
    let found = json_body(response(found)).await;
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
/// Expect the outstanding balance to sum sent and overdue invoices only
async fn detail_includes_outstanding_balance() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let client = test.crm().insert_client("Acme", None).await?;
    let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    for (number, status, amount) in [
        ("INV-2025-0001", InvoiceStatus::Sent, 1000),
        ("INV-2025-0002", InvoiceStatus::Overdue, 2500),
        ("INV-2025-0003", InvoiceStatus::Paid, 9000),
        ("INV-2025-0004", InvoiceStatus::Draft, 400),
    ] {
        test.crm()
            .insert_invoice(client.id, number, amount, status, date, date)
            .await?;
    }
    test.login(staff.id).await;

    let result = get_client(State(test.state()), test.session.clone(), Path(client.id)).await;

    let body = json_body(response(result)).await;
    assert_eq!(body["outstanding_cents"], 3500);
    assert_eq!(body["name"], "Acme");

    Ok(())
}

#[tokio::test]
/// Expect a client account to read its own record but not another client's
async fn client_reads_only_own_record() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let own = test.crm().insert_client("Acme", None).await?;
    let other = test.crm().insert_client("Other", None).await?;
    let user = test.user().insert_client_user(own.id).await?;
    test.login(user.id).await;

    let own_result = get_client(State(test.state()), test.session.clone(), Path(own.id)).await;
    let other_result =
        get_client(State(test.state()), test.session.clone(), Path(other.id)).await;
    let list_result = list_clients(
        State(test.state()),
        test.session.clone(),
        Query(ClientListParams::default()),
    )
    .await;

    assert_eq!(status(own_result), StatusCode::OK);
    assert_eq!(status(other_result), StatusCode::FORBIDDEN);
    assert_eq!(status(list_result), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
/// Expect only admins to delete clients
async fn delete_requires_admin() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let admin = test.user().insert_admin().await?;
    let client = test.crm().insert_client("Acme", None).await?;

    test.login(staff.id).await;
    let as_staff =
        delete_client(State(test.state()), test.session.clone(), Path(client.id)).await;
    test.login(admin.id).await;
    let as_admin =
        delete_client(State(test.state()), test.session.clone(), Path(client.id)).await;

    assert_eq!(status(as_staff), StatusCode::FORBIDDEN);
    assert_eq!(status(as_admin), StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
/// Expect an import summary with the bad row reported and the good rows applied
async fn import_reports_row_errors() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    test.crm().insert_client("Acme", Some("ap@acme.test")).await?;
    test.login(staff.id).await;

    let csv = "name,email,phone\n\
               Acme Surveying,ap@acme.test,555-0100\n\
               Blue Sky,hello@bluesky.test,\n\
               ,nameless@example.com,\n";
    let result = import_clients(
        State(test.state()),
        test.session.clone(),
        Bytes::from_static(csv.as_bytes()),
    )
    .await;

    let body = json_body(response(result)).await;
    assert_eq!(body["created"], 1);
    assert_eq!(body["updated"], 1);
    assert_eq!(body["errors"][0]["line"], 4);

    Ok(())
}

#[tokio::test]
/// Expect 400 when the CSV lacks the name column
async fn import_requires_name_column() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    test.login(staff.id).await;

    let result = import_clients(
        State(test.state()),
        test.session.clone(),
        Bytes::from_static(b"email\nap@acme.test\n"),
    )
    .await;

    assert_eq!(status(result), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
/// Expect a CSV attachment from the export
async fn export_is_attachment() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    test.crm().insert_client("Acme", None).await?;
    test.login(staff.id).await;

    let result = export_clients(State(test.state()), test.session.clone()).await;

    let resp = response(result);
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"clients.csv\""
    );

    Ok(())
}
