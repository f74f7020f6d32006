use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, ImportSummaryDto},
        pilot::{CreatePilotDto, PilotDto, PilotListParams, PilotScoreDto, UpdatePilotDto},
    },
    server::{
        controller::util::{
            csv::attachment,
            get_user::{get_admin_user, get_back_office_user, get_user_from_session},
        },
        error::Error,
        model::app::AppState,
        service::{csv::CsvService, pilot::PilotService},
    },
};

pub static PILOT_TAG: &str = "pilot";

#[utoipa::path(
    get,
    path = "/api/pilots",
    tag = PILOT_TAG,
    params(PilotListParams),
    responses(
        (status = 200, description = "Pilots ordered by name", body = Vec<PilotDto>),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_pilots(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<PilotListParams>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let pilots = PilotService::new(&state.db).list(&params).await?;

    Ok((StatusCode::OK, Json(pilots)))
}

#[utoipa::path(
    post,
    path = "/api/pilots",
    tag = PILOT_TAG,
    request_body = CreatePilotDto,
    responses(
        (status = 201, description = "Pilot created", body = PilotDto),
        (status = 400, description = "Missing name, invalid email or negative rate", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 409, description = "Email already used by another pilot", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_pilot(
    State(state): State<AppState>,
    session: Session,
    Json(pilot): Json<CreatePilotDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let pilot = PilotService::new(&state.db).create(pilot).await?;

    Ok((StatusCode::CREATED, Json(pilot)))
}

/// Returns a pilot; pilot accounts may only read their own profile
#[utoipa::path(
    get,
    path = "/api/pilots/{id}",
    tag = PILOT_TAG,
    params(("id" = i32, Path, description = "Pilot id")),
    responses(
        (status = 200, description = "Pilot", body = PilotDto),
        (status = 403, description = "Another pilot's profile", body = ErrorDto),
        (status = 404, description = "Pilot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_pilot(
    State(state): State<AppState>,
    session: Session,
    Path(pilot_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;
    user.require_pilot_or_back_office(pilot_id)?;

    let pilot = PilotService::new(&state.db).get(pilot_id).await?;

    Ok((StatusCode::OK, Json(pilot)))
}

#[utoipa::path(
    patch,
    path = "/api/pilots/{id}",
    tag = PILOT_TAG,
    params(("id" = i32, Path, description = "Pilot id")),
    request_body = UpdatePilotDto,
    responses(
        (status = 200, description = "Pilot updated", body = PilotDto),
        (status = 400, description = "Invalid field", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Pilot not found", body = ErrorDto),
        (status = 409, description = "Email already used by another pilot", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_pilot(
    State(state): State<AppState>,
    session: Session,
    Path(pilot_id): Path<i32>,
    Json(changes): Json<UpdatePilotDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let pilot = PilotService::new(&state.db).update(pilot_id, changes).await?;

    Ok((StatusCode::OK, Json(pilot)))
}

/// Deletes a pilot with their assignments, availability, documents and payments (admin only)
#[utoipa::path(
    delete,
    path = "/api/pilots/{id}",
    tag = PILOT_TAG,
    params(("id" = i32, Path, description = "Pilot id")),
    responses(
        (status = 204, description = "Pilot deleted"),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "Pilot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_pilot(
    State(state): State<AppState>,
    session: Session,
    Path(pilot_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_admin_user(&state, &session).await?;

    PilotService::new(&state.db).delete(pilot_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Quality score from assignment history, compliance documents and expiry dates
#[utoipa::path(
    get,
    path = "/api/pilots/{id}/score",
    tag = PILOT_TAG,
    params(("id" = i32, Path, description = "Pilot id")),
    responses(
        (status = 200, description = "Score and sub-scores", body = PilotScoreDto),
        (status = 403, description = "Another pilot's score", body = ErrorDto),
        (status = 404, description = "Pilot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_pilot_score(
    State(state): State<AppState>,
    session: Session,
    Path(pilot_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;
    user.require_pilot_or_back_office(pilot_id)?;

    let score = PilotService::new(&state.db).score(pilot_id).await?;

    Ok((StatusCode::OK, Json(score)))
}

#[utoipa::path(
    get,
    path = "/api/pilots/export",
    tag = PILOT_TAG,
    responses(
        (status = 200, description = "Pilots as CSV", body = String, content_type = "text/csv"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export_pilots(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let csv = CsvService::new(&state.db, &state.integrations)
        .export_pilots()
        .await?;

    Ok(attachment("pilots", csv))
}

/// Upserts pilots from CSV, matching on email
#[utoipa::path(
    post,
    path = "/api/pilots/import",
    tag = PILOT_TAG,
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Import summary with per-row errors", body = ImportSummaryDto),
        (status = 400, description = "Unreadable CSV or missing name/email column", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn import_pilots(
    State(state): State<AppState>,
    session: Session,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let summary = CsvService::new(&state.db, &state.integrations)
        .import_pilots(&body)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}
