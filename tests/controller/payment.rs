use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use entity::sea_orm_active_enums::{PilotPaymentStatus, PilotStatus};
use hangar::{
    model::payment::{CreatePilotPaymentDto, UpdatePilotPaymentDto},
    server::controller::payment::{
        create_pilot_payment, list_pilot_payments, update_pilot_payment,
    },
};
use hangar_test_utils::prelude::*;

use crate::util::{json_body, response, status, TestContextExt};

#[tokio::test]
/// Expect a pending payout recorded, then stamped when marked paid
async fn records_and_pays() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    test.login(staff.id).await;

    let created = create_pilot_payment(
        State(test.state()),
        test.session.clone(),
        Path(pilot.id),
        Json(CreatePilotPaymentDto {
            job_id: None,
            amount_cents: 40_000,
            method: Some("ach".to_string()),
            reference: None,
        }),
    )
    .await;
    let created = response(created);
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = json_body(created).await;
    assert_eq!(created["status"], "pending");
    assert!(created["paid_at"].is_null());

    let payment_id = created["id"].as_i64().unwrap() as i32;
    let paid = update_pilot_payment(
        State(test.state()),
        test.session.clone(),
        Path(payment_id),
        Json(UpdatePilotPaymentDto {
            status: Some(PilotPaymentStatus::Paid),
            reference: Some("ACH-1001".to_string()),
            ..Default::default()
        }),
    )
    .await;

    let paid = json_body(response(paid)).await;
    assert_eq!(paid["status"], "paid");
    assert_eq!(paid["reference"], "ACH-1001");
    assert!(!paid["paid_at"].is_null());

    Ok(())
}

#[tokio::test]
/// Expect 400 for a zero amount
async fn rejects_zero_amount() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    test.login(staff.id).await;

    let result = create_pilot_payment(
        State(test.state()),
        test.session.clone(),
        Path(pilot.id),
        Json(CreatePilotPaymentDto {
            job_id: None,
            amount_cents: 0,
            method: None,
            reference: None,
        }),
    )
    .await;

    assert_eq!(status(result), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
/// Expect a pilot to read their own payouts but not another pilot's
async fn pilot_reads_own_payouts() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let other = test
        .crm()
        .insert_pilot("Blake", "blake@example.com", PilotStatus::Active)
        .await?;
    test.crm()
        .insert_payment(pilot.id, 25_000, PilotPaymentStatus::Paid)
        .await?;
    let user = test.user().insert_pilot_user(pilot.id).await?;
    test.login(user.id).await;

    let own = list_pilot_payments(State(test.state()), test.session.clone(), Path(pilot.id)).await;
    let others =
        list_pilot_payments(State(test.state()), test.session.clone(), Path(other.id)).await;

    let own = json_body(response(own)).await;
    assert_eq!(own.as_array().map(Vec::len), Some(1));
    assert_eq!(own[0]["amount_cents"], 25_000);
    assert_eq!(status(others), StatusCode::FORBIDDEN);

    Ok(())
}
