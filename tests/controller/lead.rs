use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use entity::sea_orm_active_enums::{LeadStatus, PilotStatus};
use hangar::{
    model::lead::LeadListParams,
    server::controller::lead::{convert_lead, delete_lead, list_leads},
};
use hangar_test_utils::prelude::*;

use crate::util::{json_body, response, status, TestContextExt};

#[tokio::test]
/// Expect conversion to create a client and mark the lead won, then refuse a second run
async fn converts_once() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let lead = test
        .crm()
        .insert_lead("Jordan Lee", Some("jordan@farm.test"), LeadStatus::Qualified)
        .await?;
    test.login(staff.id).await;

    let first = convert_lead(State(test.state()), test.session.clone(), Path(lead.id)).await;
    let first = response(first);
    assert_eq!(first.status(), StatusCode::CREATED);
    let body = json_body(first).await;
    assert_eq!(body["lead"]["status"], "won");
    assert_eq!(body["client"]["email"], "jordan@farm.test");
    assert_eq!(body["lead"]["converted_client_id"], body["client"]["id"]);

    let second = convert_lead(State(test.state()), test.session.clone(), Path(lead.id)).await;
    assert_eq!(status(second), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
/// Expect conversion to reuse a client that already has the lead's email
async fn reuses_existing_client() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let client = test
        .crm()
        .insert_client("Lee Farms", Some("jordan@farm.test"))
        .await?;
    let lead = test
        .crm()
        .insert_lead("Jordan Lee", Some("jordan@farm.test"), LeadStatus::Proposal)
        .await?;
    test.login(staff.id).await;

    let result = convert_lead(State(test.state()), test.session.clone(), Path(lead.id)).await;

    let body = json_body(response(result)).await;
    assert_eq!(body["client"]["id"], client.id);
    assert_eq!(body["client"]["name"], "Lee Farms");

    Ok(())
}

#[tokio::test]
/// Expect the status filter to apply
async fn filters_by_status() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    test.crm().insert_lead("New", None, LeadStatus::New).await?;
    test.crm().insert_lead("Lost", None, LeadStatus::Lost).await?;
    test.login(staff.id).await;

    let result = list_leads(
        State(test.state()),
        test.session.clone(),
        Query(LeadListParams {
            status: Some(LeadStatus::Lost),
        }),
    )
    .await;

    let body = json_body(response(result)).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["name"], "Lost");

    Ok(())
}

#[tokio::test]
/// Expect leads hidden from pilots and deletable by staff
async fn access_rules() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let lead = test.crm().insert_lead("Jordan", None, LeadStatus::New).await?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let pilot_user = test.user().insert_pilot_user(pilot.id).await?;
    let staff = test.user().insert_staff().await?;

    test.login(pilot_user.id).await;
    let listed = list_leads(
        State(test.state()),
        test.session.clone(),
        Query(LeadListParams::default()),
    )
    .await;
    assert_eq!(status(listed), StatusCode::FORBIDDEN);

    let refused = delete_lead(State(test.state()), test.session.clone(), Path(lead.id)).await;
    assert_eq!(status(refused), StatusCode::FORBIDDEN);

    test.login(staff.id).await;
    let deleted = delete_lead(State(test.state()), test.session.clone(), Path(lead.id)).await;
    assert_eq!(status(deleted), StatusCode::NO_CONTENT);

    Ok(())
}
