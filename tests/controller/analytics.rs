use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{Days, Utc};
use entity::sea_orm_active_enums::{
    ComplianceDocType, ComplianceStatus, InvoiceStatus, JobStatus, LeadStatus, PilotStatus,
};
use hangar::{
    model::analytics::ForecastParams,
    server::controller::analytics::{get_dashboard, get_forecast},
};
use hangar_test_utils::prelude::*;

use crate::util::{json_body, response, status, TestContextExt};

#[tokio::test]
/// Expect dashboard counts and totals drawn from every table
async fn dashboard_totals() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let today = Utc::now().date_naive();
    let client = test.crm().insert_client("Acme", None).await?;
    test.crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let inactive = test
        .crm()
        .insert_pilot("Blake", "blake@example.com", PilotStatus::Inactive)
        .await?;
    test.crm()
        .insert_job(client.id, "Survey", JobStatus::Pending, None)
        .await?;
    test.crm()
        .insert_invoice(client.id, "INV-1", 2_000, InvoiceStatus::Sent, today, today)
        .await?;
    test.crm()
        .insert_invoice(client.id, "INV-2", 5_000, InvoiceStatus::Paid, today, today)
        .await?;
    test.crm()
        .insert_lead("Open", None, LeadStatus::Contacted)
        .await?;
    test.crm().insert_lead("Closed", None, LeadStatus::Lost).await?;
    test.crm()
        .insert_compliance_doc(
            inactive.id,
            ComplianceDocType::Insurance,
            ComplianceStatus::Pending,
            today.checked_add_days(Days::new(3)),
        )
        .await?;
    test.login(staff.id).await;

    let result = get_dashboard(State(test.state()), test.session.clone()).await;

    let body = json_body(response(result)).await;
    assert_eq!(body["client_count"], 1);
    assert_eq!(body["active_pilot_count"], 1);
    assert_eq!(body["open_lead_count"], 1);
    assert_eq!(body["outstanding_cents"], 2_000);
    assert_eq!(body["revenue_year_cents"], 5_000);
    assert_eq!(body["docs_pending_review"], 1);
    assert_eq!(body["docs_expiring_soon"], 1);
    let pending = body["jobs_by_status"]
        .as_array()
        .and_then(|counts| counts.iter().find(|c| c["status"] == "pending"))
        .cloned();
    assert_eq!(pending.map(|c| c["count"].clone()), Some(1.into()));

    Ok(())
}

#[tokio::test]
/// Expect a past year to be all actuals with nothing projected
async fn past_year_forecast() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    test.login(staff.id).await;

    let result = get_forecast(
        State(test.state()),
        test.session.clone(),
        Query(ForecastParams { year: Some(2020) }),
    )
    .await;

    let body = json_body(response(result)).await;
    assert_eq!(body["year"], 2020);
    let months = body["months"].as_array().cloned().unwrap_or_default();
    assert_eq!(months.len(), 12);
    assert!(months.iter().all(|m| m["projected"] == false));
    assert_eq!(body["projected_total_cents"], 0);

    Ok(())
}

#[tokio::test]
/// Expect analytics hidden from client accounts
async fn client_forbidden() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let client = test.crm().insert_client("Acme", None).await?;
    let user = test.user().insert_client_user(client.id).await?;
    test.login(user.id).await;

    let result = get_dashboard(State(test.state()), test.session.clone()).await;

    assert_eq!(status(result), StatusCode::FORBIDDEN);

    Ok(())
}
