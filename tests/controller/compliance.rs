use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Days, Utc};
use entity::sea_orm_active_enums::{ComplianceDocType, ComplianceStatus, PilotStatus};
use hangar::{
    model::compliance::{
        ComplianceListParams, CreateComplianceDocDto, ExpiringParams, ReviewComplianceDocDto,
        SubmitW9Dto,
    },
    server::controller::compliance::{
        create_compliance_doc, get_w9, list_compliance_docs, list_expiring_docs,
        review_compliance_doc, submit_w9,
    },
};
use hangar_test_utils::prelude::*;

use crate::util::{json_body, response, status, TestContextExt};

fn w9(tin: &str) -> Json<SubmitW9Dto> {
    Json(SubmitW9Dto {
        legal_name: "Avery Quinn".to_string(),
        business_name: None,
        tax_classification: "individual".to_string(),
        tin: tin.to_string(),
        address: "1 Hangar Rd".to_string(),
    })
}

#[tokio::test]
/// Expect a pilot's upload pending review, and only their own documents listed
async fn pilot_uploads_and_lists_own() -> Result<(), TestError> {
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
        .insert_compliance_doc(
            other.id,
            ComplianceDocType::Insurance,
            ComplianceStatus::Approved,
            None,
        )
        .await?;
    let user = test.user().insert_pilot_user(pilot.id).await?;
    test.login(user.id).await;

    let created = create_compliance_doc(
        State(test.state()),
        test.session.clone(),
        Json(CreateComplianceDocDto {
            pilot_id: pilot.id,
            doc_type: ComplianceDocType::FaaCert,
            file_url: Some("https://files.example.com/part107.pdf".to_string()),
            expires_on: None,
            notes: None,
        }),
    )
    .await;
    let created = response(created);
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(json_body(created).await["status"], "pending");

    let listed = list_compliance_docs(
        State(test.state()),
        test.session.clone(),
        Query(ComplianceListParams {
            pilot_id: Some(other.id),
            status: None,
        }),
    )
    .await;

    let body = json_body(response(listed)).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["pilot_id"], pilot.id);

    Ok(())
}

#[tokio::test]
/// Expect 403 when a pilot uploads for someone else or reviews a document
async fn pilot_limits() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let other = test
        .crm()
        .insert_pilot("Blake", "blake@example.com", PilotStatus::Active)
        .await?;
    let doc = test
        .crm()
        .insert_compliance_doc(
            pilot.id,
            ComplianceDocType::Insurance,
            ComplianceStatus::Pending,
            None,
        )
        .await?;
    let user = test.user().insert_pilot_user(pilot.id).await?;
    test.login(user.id).await;

    let upload = create_compliance_doc(
        State(test.state()),
        test.session.clone(),
        Json(CreateComplianceDocDto {
            pilot_id: other.id,
            doc_type: ComplianceDocType::Other,
            file_url: None,
            expires_on: None,
            notes: None,
        }),
    )
    .await;
    let review = review_compliance_doc(
        State(test.state()),
        test.session.clone(),
        Path(doc.id),
        Json(ReviewComplianceDocDto {
            status: ComplianceStatus::Approved,
            notes: None,
        }),
    )
    .await;

    assert_eq!(status(upload), StatusCode::FORBIDDEN);
    assert_eq!(status(review), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
/// Expect staff approval to record the reviewer
async fn staff_approves() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let doc = test
        .crm()
        .insert_compliance_doc(
            pilot.id,
            ComplianceDocType::Insurance,
            ComplianceStatus::Pending,
            None,
        )
        .await?;
    test.login(staff.id).await;

    let result = review_compliance_doc(
        State(test.state()),
        test.session.clone(),
        Path(doc.id),
        Json(ReviewComplianceDocDto {
            status: ComplianceStatus::Approved,
            notes: Some("Policy verified".to_string()),
        }),
    )
    .await;

    let body = json_body(response(result)).await;
    assert_eq!(body["status"], "approved");
    assert_eq!(body["reviewed_by"], staff.id);

    Ok(())
}

#[tokio::test]
/// Expect only documents expiring inside the window
async fn lists_expiring() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let today = Utc::now().date_naive();
    let soon = test
        .crm()
        .insert_compliance_doc(
            pilot.id,
            ComplianceDocType::Insurance,
            ComplianceStatus::Approved,
            today.checked_add_days(Days::new(5)),
        )
        .await?;
    test.crm()
        .insert_compliance_doc(
            pilot.id,
            ComplianceDocType::FaaCert,
            ComplianceStatus::Approved,
            today.checked_add_days(Days::new(90)),
        )
        .await?;
    test.login(staff.id).await;

    let result = list_expiring_docs(
        State(test.state()),
        test.session.clone(),
        Query(ExpiringParams { days: Some(30) }),
    )
    .await;

    let body = json_body(response(result)).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], soon.id);

    Ok(())
}

#[tokio::test]
/// Expect a W-9 stored with only the last four TIN digits and a pending document filed
async fn submits_w9() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let user = test.user().insert_pilot_user(pilot.id).await?;
    test.login(user.id).await;

    let submitted = submit_w9(
        State(test.state()),
        test.session.clone(),
        Path(pilot.id),
        w9("123-45-6789"),
    )
    .await;
    assert_eq!(json_body(response(submitted)).await["tin_last4"], "6789");

    let fetched = get_w9(State(test.state()), test.session.clone(), Path(pilot.id)).await;
    let fetched = json_body(response(fetched)).await;
    assert_eq!(fetched["legal_name"], "Avery Quinn");
    assert!(fetched.get("tin").is_none());

    let docs = list_compliance_docs(
        State(test.state()),
        test.session.clone(),
        Query(ComplianceListParams::default()),
    )
    .await;
    let docs = json_body(response(docs)).await;
    assert_eq!(docs[0]["doc_type"], "w9");
    assert_eq!(docs[0]["status"], "pending");

    Ok(())
}

#[tokio::test]
/// Expect 400 for a TIN without nine digits
async fn rejects_short_tin() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    test.login(staff.id).await;

    let result = submit_w9(
        State(test.state()),
        test.session.clone(),
        Path(pilot.id),
        w9("12-345"),
    )
    .await;

    assert_eq!(status(result), StatusCode::BAD_REQUEST);

    Ok(())
}
