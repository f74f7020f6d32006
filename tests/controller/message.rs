use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use entity::sea_orm_active_enums::JobStatus;
use hangar::{
    model::message::{CreateMessageDto, MessageListParams},
    server::controller::message::{list_messages, post_message},
};
use hangar_test_utils::prelude::*;

use crate::util::{json_body, response, status, TestContextExt};

fn message(body: &str) -> Json<CreateMessageDto> {
    Json(CreateMessageDto {
        body: body.to_string(),
    })
}

#[tokio::test]
/// Expect a client to post on their job and read messages after a given id
async fn client_posts_and_polls() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let client = test.crm().insert_client("Acme", Some("ops@acme.test")).await?;
    let job = test
        .crm()
        .insert_job(client.id, "Survey", JobStatus::Scheduled, None)
        .await?;
    let user = test.user().insert_client_user(client.id).await?;
    test.login(user.id).await;

    let first = post_message(
        State(test.state()),
        test.session.clone(),
        Path(job.id),
        message("  When will the crew arrive?  "),
    )
    .await;
    let first = response(first);
    assert_eq!(first.status(), StatusCode::CREATED);
    let first = json_body(first).await;
    assert_eq!(first["body"], "When will the crew arrive?");

    post_message(
        State(test.state()),
        test.session.clone(),
        Path(job.id),
        message("Gate code is 1234"),
    )
    .await
    .unwrap();

    let result = list_messages(
        State(test.state()),
        test.session.clone(),
        Path(job.id),
        Query(MessageListParams {
            after_id: first["id"].as_i64().map(|id| id as i32),
        }),
    )
    .await;

    let body = json_body(response(result)).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["body"], "Gate code is 1234");

    Ok(())
}

#[tokio::test]
/// Expect 400 for a blank message body
async fn blank_body_rejected() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let client = test.crm().insert_client("Acme", None).await?;
    let job = test
        .crm()
        .insert_job(client.id, "Survey", JobStatus::Pending, None)
        .await?;
    test.login(staff.id).await;

    let result = post_message(
        State(test.state()),
        test.session.clone(),
        Path(job.id),
        message("   "),
    )
    .await;

    assert_eq!(status(result), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
/// Expect 403 when a client reads another client's thread
async fn other_client_forbidden() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let own = test.crm().insert_client("Acme", None).await?;
    let other = test.crm().insert_client("Other", None).await?;
    let job = test
        .crm()
        .insert_job(other.id, "Survey", JobStatus::Pending, None)
        .await?;
    let user = test.user().insert_client_user(own.id).await?;
    test.login(user.id).await;

    let result = list_messages(
        State(test.state()),
        test.session.clone(),
        Path(job.id),
        Query(MessageListParams::default()),
    )
    .await;

    assert_eq!(status(result), StatusCode::FORBIDDEN);

    Ok(())
}
