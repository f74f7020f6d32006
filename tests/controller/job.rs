use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use entity::sea_orm_active_enums::{AssignmentStatus, JobStatus, PilotStatus};
use hangar::{
    model::job::{
        CreateAssignmentDto, CreateJobDto, CreateJobFileDto, JobListParams, UpdateAssignmentDto,
    },
    server::controller::job::{
        add_job_file, assign_pilot, create_job, get_job, list_jobs, track_job, update_assignment,
    },
};
use hangar_test_utils::prelude::*;

use crate::util::{json_body, response, status, TestContextExt};

#[tokio::test]
/// Expect the tracking endpoint to show a created job without its price or a login
async fn created_job_is_trackable() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let client = test.crm().insert_client("Acme", None).await?;
    test.login(staff.id).await;

    let created = create_job(
        State(test.state()),
        test.session.clone(),
        Json(CreateJobDto {
            client_id: client.id,
            title: "Roof inspection".to_string(),
            description: None,
            location: Some("12 Main St".to_string()),
            scheduled_date: NaiveDate::from_ymd_opt(2025, 6, 2),
            status: None,
            price_cents: Some(120_000),
        }),
    )
    .await;
    let created = response(created);
    assert_eq!(created.status(), StatusCode::CREATED);
    let job = json_body(created).await;
    let token = job["tracking_token"].as_str().unwrap().to_string();

    let tracked = track_job(State(test.unconfigured_state()), Path(token)).await;

    let tracked = json_body(response(tracked)).await;
    assert_eq!(tracked["title"], "Roof inspection");
    assert_eq!(tracked["client_name"], "Acme");
    assert!(tracked.get("price_cents").is_none());

    Ok(())
}

#[tokio::test]
/// Expect 404 for an unknown tracking token
async fn unknown_tracking_token() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;

    let result = track_job(State(test.state()), Path("missing".to_string())).await;

    assert_eq!(status(result), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
/// Expect a pilot to list only assigned jobs with the price hidden
async fn pilot_lists_assigned_jobs() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let client = test.crm().insert_client("Acme", None).await?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let assigned = test
        .crm()
        .insert_job(client.id, "Assigned", JobStatus::Scheduled, None)
        .await?;
    test.crm()
        .insert_job(client.id, "Unassigned", JobStatus::Scheduled, None)
        .await?;
    test.crm()
        .insert_assignment(assigned.id, pilot.id, AssignmentStatus::Assigned)
        .await?;
    let user = test.user().insert_pilot_user(pilot.id).await?;
    test.login(user.id).await;

    let result = list_jobs(
        State(test.state()),
        test.session.clone(),
        Query(JobListParams::default()),
    )
    .await;

    let body = json_body(response(result)).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], assigned.id);
    assert!(body[0]["price_cents"].is_null());

    Ok(())
}

#[tokio::test]
/// Expect a client to be refused another client's job
async fn client_cannot_read_other_job() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let own = test.crm().insert_client("Acme", None).await?;
    let other = test.crm().insert_client("Other", None).await?;
    let job = test
        .crm()
        .insert_job(other.id, "Survey", JobStatus::Pending, None)
        .await?;
    let user = test.user().insert_client_user(own.id).await?;
    test.login(user.id).await;

    let result = get_job(State(test.state()), test.session.clone(), Path(job.id)).await;

    assert_eq!(status(result), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
/// Expect 409 when the same pilot is assigned twice
async fn assigning_twice_conflicts() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let client = test.crm().insert_client("Acme", None).await?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let job = test
        .crm()
        .insert_job(client.id, "Survey", JobStatus::Pending, None)
        .await?;
    test.login(staff.id).await;

    let assign = || {
        assign_pilot(
            State(test.state()),
            test.session.clone(),
            Path(job.id),
            Json(CreateAssignmentDto {
                pilot_id: pilot.id,
                pay_cents: Some(40_000),
            }),
        )
    };
    let first = assign().await;
    let second = assign().await;

    assert_eq!(status(first), StatusCode::CREATED);
    assert_eq!(status(second), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
/// Expect a pilot to accept their assignment but not mark it completed
async fn pilot_accepts_own_assignment() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let client = test.crm().insert_client("Acme", None).await?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let job = test
        .crm()
        .insert_job(client.id, "Survey", JobStatus::Scheduled, None)
        .await?;
    test.crm()
        .insert_assignment(job.id, pilot.id, AssignmentStatus::Assigned)
        .await?;
    let user = test.user().insert_pilot_user(pilot.id).await?;
    test.login(user.id).await;

    let set = |to| {
        update_assignment(
            State(test.state()),
            test.session.clone(),
            Path((job.id, pilot.id)),
            Json(UpdateAssignmentDto { status: to }),
        )
    };
    let accepted = set(AssignmentStatus::Accepted).await;
    let completed = set(AssignmentStatus::Completed).await;

    assert_eq!(json_body(response(accepted)).await["status"], "accepted");
    assert_eq!(status(completed), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
/// Expect 403 when a client account tries to attach a file
async fn client_cannot_add_file() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let client = test.crm().insert_client("Acme", None).await?;
    let job = test
        .crm()
        .insert_job(client.id, "Survey", JobStatus::Completed, None)
        .await?;
    let user = test.user().insert_client_user(client.id).await?;
    test.login(user.id).await;

    let result = add_job_file(
        State(test.state()),
        test.session.clone(),
        Path(job.id),
        Json(CreateJobFileDto {
            file_name: "orthomosaic.tif".to_string(),
            url: "https://files.example.com/orthomosaic.tif".to_string(),
            content_type: None,
            size_bytes: None,
        }),
    )
    .await;

    assert_eq!(status(result), StatusCode::FORBIDDEN);

    Ok(())
}
