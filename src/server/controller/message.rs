use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        message::{CreateMessageDto, MessageDto, MessageListParams},
    },
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::message::MessageService,
    },
};

pub static MESSAGE_TAG: &str = "message";

/// Messages on a job in posting order
///
/// Poll with `after_id` set to the last id seen to fetch only new messages.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}/messages",
    tag = MESSAGE_TAG,
    params(("id" = i32, Path, description = "Job id"), MessageListParams),
    responses(
        (status = 200, description = "Messages ascending by id", body = Vec<MessageDto>),
        (status = 403, description = "Job not visible to the caller", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_messages(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
    Query(params): Query<MessageListParams>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let messages = MessageService::new(&state.db, &state.integrations)
        .list(&user, job_id, params.after_id)
        .await?;

    Ok((StatusCode::OK, Json(messages)))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/messages",
    tag = MESSAGE_TAG,
    params(("id" = i32, Path, description = "Job id")),
    request_body = CreateMessageDto,
    responses(
        (status = 201, description = "Message posted", body = MessageDto),
        (status = 400, description = "Empty or overlong body", body = ErrorDto),
        (status = 403, description = "Job not visible to the caller", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn post_message(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
    Json(message): Json<CreateMessageDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let message = MessageService::new(&state.db, &state.integrations)
        .post(&user, job_id, message)
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}
