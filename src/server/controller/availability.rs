use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        availability::{
            AvailabilityDto, AvailabilityRangeParams, AvailableOnParams, SetAvailabilityDto,
        },
        pilot::PilotDto,
    },
    server::{
        controller::util::get_user::{get_back_office_user, get_user_from_session},
        error::Error,
        model::app::AppState,
        service::availability::AvailabilityService,
    },
};

pub static AVAILABILITY_TAG: &str = "availability";

/// Days in `from..=to` on which the pilot has an explicit availability entry
#[utoipa::path(
    get,
    path = "/api/pilots/{id}/availability",
    tag = AVAILABILITY_TAG,
    params(("id" = i32, Path, description = "Pilot id"), AvailabilityRangeParams),
    responses(
        (status = 200, description = "Entries in date order", body = Vec<AvailabilityDto>),
        (status = 400, description = "Range reversed or longer than a year", body = ErrorDto),
        (status = 403, description = "Another pilot's calendar", body = ErrorDto),
        (status = 404, description = "Pilot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_availability(
    State(state): State<AppState>,
    session: Session,
    Path(pilot_id): Path<i32>,
    Query(params): Query<AvailabilityRangeParams>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;
    user.require_pilot_or_back_office(pilot_id)?;

    let days = AvailabilityService::new(&state.db)
        .range(pilot_id, params.from, params.to)
        .await?;

    Ok((StatusCode::OK, Json(days)))
}

/// Marks one day available or unavailable; repeating the same value changes nothing
#[utoipa::path(
    put,
    path = "/api/pilots/{id}/availability/{date}",
    tag = AVAILABILITY_TAG,
    params(
        ("id" = i32, Path, description = "Pilot id"),
        ("date" = String, Path, description = "Day as YYYY-MM-DD")
    ),
    request_body = SetAvailabilityDto,
    responses(
        (status = 200, description = "Stored entry", body = AvailabilityDto),
        (status = 403, description = "Another pilot's calendar", body = ErrorDto),
        (status = 404, description = "Pilot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn set_availability(
    State(state): State<AppState>,
    session: Session,
    Path((pilot_id, date)): Path<(i32, NaiveDate)>,
    Json(entry): Json<SetAvailabilityDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;
    user.require_pilot_or_back_office(pilot_id)?;

    let day = AvailabilityService::new(&state.db)
        .set(pilot_id, date, entry.available)
        .await?;

    Ok((StatusCode::OK, Json(day)))
}

/// Active pilots explicitly marked available on a date, for dispatch
#[utoipa::path(
    get,
    path = "/api/availability",
    tag = AVAILABILITY_TAG,
    params(AvailableOnParams),
    responses(
        (status = 200, description = "Available pilots ordered by name", body = Vec<PilotDto>),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_available_pilots(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<AvailableOnParams>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let pilots = AvailabilityService::new(&state.db)
        .available_on(params.date)
        .await?;

    Ok((StatusCode::OK, Json(pilots)))
}
