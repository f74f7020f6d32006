use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        compliance::{
            ComplianceDocDto, ComplianceListParams, CreateComplianceDocDto, ExpiringParams,
            ReviewComplianceDocDto, SubmitW9Dto, W9Dto,
        },
    },
    server::{
        controller::util::get_user::{get_back_office_user, get_user_from_session},
        error::Error,
        model::app::AppState,
        service::compliance::ComplianceService,
    },
};

pub static COMPLIANCE_TAG: &str = "compliance";

/// Lists compliance documents, pilots only seeing their own
#[utoipa::path(
    get,
    path = "/api/compliance",
    tag = COMPLIANCE_TAG,
    params(ComplianceListParams),
    responses(
        (status = 200, description = "Documents, newest first", body = Vec<ComplianceDocDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Client accounts", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_compliance_docs(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ComplianceListParams>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let docs = ComplianceService::new(&state.db, &state.integrations)
        .list(&user, params)
        .await?;

    Ok((StatusCode::OK, Json(docs)))
}

/// Files a document for review; the back office is notified
#[utoipa::path(
    post,
    path = "/api/compliance",
    tag = COMPLIANCE_TAG,
    request_body = CreateComplianceDocDto,
    responses(
        (status = 201, description = "Document filed as pending", body = ComplianceDocDto),
        (status = 400, description = "Unknown pilot or invalid field", body = ErrorDto),
        (status = 403, description = "Document for another pilot", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_compliance_doc(
    State(state): State<AppState>,
    session: Session,
    Json(doc): Json<CreateComplianceDocDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let doc = ComplianceService::new(&state.db, &state.integrations)
        .create(&user, doc)
        .await?;

    Ok((StatusCode::CREATED, Json(doc)))
}

#[utoipa::path(
    patch,
    path = "/api/compliance/{id}/review",
    tag = COMPLIANCE_TAG,
    params(("id" = i32, Path, description = "Document id")),
    request_body = ReviewComplianceDocDto,
    responses(
        (status = 200, description = "Review recorded", body = ComplianceDocDto),
        (status = 400, description = "Review status must be approved or rejected", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Document not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn review_compliance_doc(
    State(state): State<AppState>,
    session: Session,
    Path(doc_id): Path<i32>,
    Json(review): Json<ReviewComplianceDocDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let doc = ComplianceService::new(&state.db, &state.integrations)
        .review(&user, doc_id, review)
        .await?;

    Ok((StatusCode::OK, Json(doc)))
}

#[utoipa::path(
    delete,
    path = "/api/compliance/{id}",
    tag = COMPLIANCE_TAG,
    params(("id" = i32, Path, description = "Document id")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Document not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_compliance_doc(
    State(state): State<AppState>,
    session: Session,
    Path(doc_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    ComplianceService::new(&state.db, &state.integrations)
        .delete(doc_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Documents expiring from today through the look-ahead window
#[utoipa::path(
    get,
    path = "/api/compliance/expiring",
    tag = COMPLIANCE_TAG,
    params(ExpiringParams),
    responses(
        (status = 200, description = "Expiring documents", body = Vec<ComplianceDocDto>),
        (status = 400, description = "Window out of range", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_expiring_docs(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ExpiringParams>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let today = Utc::now().date_naive();
    let docs = ComplianceService::new(&state.db, &state.integrations)
        .expiring(today, params.days)
        .await?;

    Ok((StatusCode::OK, Json(docs)))
}

#[utoipa::path(
    get,
    path = "/api/pilots/{id}/w9",
    tag = COMPLIANCE_TAG,
    params(("id" = i32, Path, description = "Pilot id")),
    responses(
        (status = 200, description = "W-9 on file, TIN masked", body = W9Dto),
        (status = 403, description = "Another pilot's W-9", body = ErrorDto),
        (status = 404, description = "No W-9 on file", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_w9(
    State(state): State<AppState>,
    session: Session,
    Path(pilot_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let w9 = ComplianceService::new(&state.db, &state.integrations)
        .get_w9(&user, pilot_id)
        .await?;

    Ok((StatusCode::OK, Json(w9)))
}

/// Submits or replaces a pilot's W-9; only the last four TIN digits are stored
#[utoipa::path(
    put,
    path = "/api/pilots/{id}/w9",
    tag = COMPLIANCE_TAG,
    params(("id" = i32, Path, description = "Pilot id")),
    request_body = SubmitW9Dto,
    responses(
        (status = 200, description = "W-9 stored", body = W9Dto),
        (status = 400, description = "Missing field or TIN not 9 digits", body = ErrorDto),
        (status = 403, description = "Another pilot's W-9", body = ErrorDto),
        (status = 404, description = "Pilot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn submit_w9(
    State(state): State<AppState>,
    session: Session,
    Path(pilot_id): Path<i32>,
    Json(form): Json<SubmitW9Dto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let w9 = ComplianceService::new(&state.db, &state.integrations)
        .submit_w9(&user, pilot_id, form)
        .await?;

    Ok((StatusCode::OK, Json(w9)))
}
