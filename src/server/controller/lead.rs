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
        lead::{CreateLeadDto, LeadConversionDto, LeadDto, LeadListParams, UpdateLeadDto},
    },
    server::{
        controller::util::{
            csv::attachment,
            get_user::get_back_office_user,
        },
        error::Error,
        model::app::AppState,
        service::{csv::CsvService, lead::LeadService},
    },
};

pub static LEAD_TAG: &str = "lead";

#[utoipa::path(
    get,
    path = "/api/leads",
    tag = LEAD_TAG,
    params(LeadListParams),
    responses(
        (status = 200, description = "Leads, newest first", body = Vec<LeadDto>),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_leads(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<LeadListParams>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let leads = LeadService::new(&state.db).list(params.status).await?;

    Ok((StatusCode::OK, Json(leads)))
}

#[utoipa::path(
    post,
    path = "/api/leads",
    tag = LEAD_TAG,
    request_body = CreateLeadDto,
    responses(
        (status = 201, description = "Lead created", body = LeadDto),
        (status = 400, description = "Missing name or invalid email", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_lead(
    State(state): State<AppState>,
    session: Session,
    Json(lead): Json<CreateLeadDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let lead = LeadService::new(&state.db).create(lead).await?;

    Ok((StatusCode::CREATED, Json(lead)))
}

#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = LEAD_TAG,
    params(("id" = i32, Path, description = "Lead id")),
    responses(
        (status = 200, description = "Lead", body = LeadDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Lead not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_lead(
    State(state): State<AppState>,
    session: Session,
    Path(lead_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let lead = LeadService::new(&state.db).get(lead_id).await?;

    Ok((StatusCode::OK, Json(lead)))
}

#[utoipa::path(
    patch,
    path = "/api/leads/{id}",
    tag = LEAD_TAG,
    params(("id" = i32, Path, description = "Lead id")),
    request_body = UpdateLeadDto,
    responses(
        (status = 200, description = "Lead updated", body = LeadDto),
        (status = 400, description = "Invalid field", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Lead not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_lead(
    State(state): State<AppState>,
    session: Session,
    Path(lead_id): Path<i32>,
    Json(changes): Json<UpdateLeadDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let lead = LeadService::new(&state.db).update(lead_id, changes).await?;

    Ok((StatusCode::OK, Json(lead)))
}

#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = LEAD_TAG,
    params(("id" = i32, Path, description = "Lead id")),
    responses(
        (status = 204, description = "Lead deleted"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Lead not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_lead(
    State(state): State<AppState>,
    session: Session,
    Path(lead_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    LeadService::new(&state.db).delete(lead_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Converts a lead into a client and marks it won
///
/// A lead already converted is refused rather than creating a second client.
#[utoipa::path(
    post,
    path = "/api/leads/{id}/convert",
    tag = LEAD_TAG,
    params(("id" = i32, Path, description = "Lead id")),
    responses(
        (status = 201, description = "Client created from the lead", body = LeadConversionDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Lead not found", body = ErrorDto),
        (status = 409, description = "Lead already converted", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn convert_lead(
    State(state): State<AppState>,
    session: Session,
    Path(lead_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let conversion = LeadService::new(&state.db).convert(lead_id).await?;

    Ok((StatusCode::CREATED, Json(conversion)))
}

#[utoipa::path(
    get,
    path = "/api/leads/export",
    tag = LEAD_TAG,
    responses(
        (status = 200, description = "Leads as CSV", body = String, content_type = "text/csv"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export_leads(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let csv = CsvService::new(&state.db, &state.integrations)
        .export_leads()
        .await?;

    Ok(attachment("leads", csv))
}

#[utoipa::path(
    post,
    path = "/api/leads/import",
    tag = LEAD_TAG,
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Import summary with per-row errors", body = ImportSummaryDto),
        (status = 400, description = "Unreadable CSV or missing name column", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn import_leads(
    State(state): State<AppState>,
    session: Session,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let summary = CsvService::new(&state.db, &state.integrations)
        .import_leads(&body)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}
