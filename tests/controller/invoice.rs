use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use entity::sea_orm_active_enums::InvoiceStatus;
use hangar::{
    model::invoice::CreateInvoiceDto,
    server::controller::invoice::{checkout_invoice, create_invoice, delete_invoice},
};
use hangar_test_utils::{fixtures::provider, prelude::*};

use crate::util::{json_body, response, status, TestContextExt};

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

#[tokio::test]
/// Expect a numbered invoice due 30 days after issue when no due date is given
async fn staff_creates_invoice() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let client = test.crm().insert_client("Acme", None).await?;
    test.login(staff.id).await;

    let result = create_invoice(
        State(test.state()),
        test.session.clone(),
        Json(CreateInvoiceDto {
            client_id: client.id,
            job_id: None,
            amount_cents: 150_000,
            status: None,
            issue_date: Some(june(1)),
            due_date: None,
            notes: None,
        }),
    )
    .await;

    let resp = response(result);
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["invoice_number"], "INV-2025-0001");
    assert_eq!(body["due_date"], "2025-07-01");

    Ok(())
}

#[tokio::test]
/// Expect a client to start Stripe checkout for their own invoice
async fn client_checks_out() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_crm_tables()
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/v1/checkout/sessions")
                .match_header("authorization", "Bearer sk_test")
                .with_status(200)
                .with_body(
                    provider::stripe_checkout_session(
                        "cs_test_9",
                        "https://checkout.stripe.com/c/cs_test_9",
                    )
                    .to_string(),
                )
                .create()
        })
        .build()
        .await?;
    let client = test.crm().insert_client("Acme", Some("ap@acme.test")).await?;
    let invoice = test
        .crm()
        .insert_invoice(
            client.id,
            "INV-2025-0001",
            150_000,
            InvoiceStatus::Sent,
            june(1),
            june(30),
        )
        .await?;
    let user = test.user().insert_client_user(client.id).await?;
    test.login(user.id).await;

    let result = checkout_invoice(State(test.state()), test.session.clone(), Path(invoice.id)).await;

    test.assert_mocks();
    let body = json_body(response(result)).await;
    assert_eq!(body["session_id"], "cs_test_9");
    assert_eq!(body["url"], "https://checkout.stripe.com/c/cs_test_9");

    Ok(())
}

#[tokio::test]
/// Expect 400 for an invoice that is already paid
async fn paid_invoice_not_payable() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let client = test.crm().insert_client("Acme", None).await?;
    let invoice = test
        .crm()
        .insert_invoice(
            client.id,
            "INV-2025-0001",
            1000,
            InvoiceStatus::Paid,
            june(1),
            june(30),
        )
        .await?;
    test.login(staff.id).await;

    let result = checkout_invoice(State(test.state()), test.session.clone(), Path(invoice.id)).await;

    assert_eq!(status(result), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
/// Expect 503 when Stripe is not configured
async fn checkout_without_stripe() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let client = test.crm().insert_client("Acme", None).await?;
    let invoice = test
        .crm()
        .insert_invoice(
            client.id,
            "INV-2025-0001",
            1000,
            InvoiceStatus::Sent,
            june(1),
            june(30),
        )
        .await?;
    test.login(staff.id).await;

    let result = checkout_invoice(
        State(test.unconfigured_state()),
        test.session.clone(),
        Path(invoice.id),
    )
    .await;

    assert_eq!(status(result), StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}

#[tokio::test]
/// Expect staff allowed and the invoiced client refused to delete an invoice
async fn staff_deletes_invoice() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let client = test.crm().insert_client("Acme", None).await?;
    let client_user = test.user().insert_client_user(client.id).await?;
    let invoice = test
        .crm()
        .insert_invoice(
            client.id,
            "INV-2025-0001",
            1000,
            InvoiceStatus::Draft,
            june(1),
            june(30),
        )
        .await?;

    test.login(client_user.id).await;
    let refused =
        delete_invoice(State(test.state()), test.session.clone(), Path(invoice.id)).await;
    test.login(staff.id).await;
    let deleted =
        delete_invoice(State(test.state()), test.session.clone(), Path(invoice.id)).await;

    assert_eq!(status(refused), StatusCode::FORBIDDEN);
    assert_eq!(status(deleted), StatusCode::NO_CONTENT);

    Ok(())
}
