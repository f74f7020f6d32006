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
        job::{
            AssignmentDto, CreateAssignmentDto, CreateJobDto, CreateJobFileDto, JobDto,
            JobFileDto, JobListParams, TrackingDto, UpdateAssignmentDto, UpdateJobDto,
        },
    },
    server::{
        controller::util::{
            csv::attachment,
            get_user::{get_back_office_user, get_user_from_session},
        },
        error::Error,
        model::app::AppState,
        service::{csv::CsvService, job::JobService},
    },
};

pub static JOB_TAG: &str = "job";

/// Lists jobs visible to the caller
///
/// Pilots only ever see jobs they are assigned to and clients only their own, whatever
/// filters they pass. Prices are hidden from pilots.
#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = JOB_TAG,
    params(JobListParams),
    responses(
        (status = 200, description = "Jobs, soonest scheduled first", body = Vec<JobDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<JobListParams>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let jobs = JobService::new(&state.db, &state.integrations)
        .list(&user, params)
        .await?;

    Ok((StatusCode::OK, Json(jobs)))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = JOB_TAG,
    request_body = CreateJobDto,
    responses(
        (status = 201, description = "Job created with a tracking token", body = JobDto),
        (status = 400, description = "Missing title, negative price or unknown client", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_job(
    State(state): State<AppState>,
    session: Session,
    Json(job): Json<CreateJobDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let job = JobService::new(&state.db, &state.integrations)
        .create(job)
        .await?;

    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = JOB_TAG,
    params(("id" = i32, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job with its assignments", body = JobDto),
        (status = 403, description = "Job not visible to the caller", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_job(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let job = JobService::new(&state.db, &state.integrations)
        .get(&user, job_id)
        .await?;

    Ok((StatusCode::OK, Json(job)))
}

/// Applies a partial update; completing a job completes its open assignments
#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    tag = JOB_TAG,
    params(("id" = i32, Path, description = "Job id")),
    request_body = UpdateJobDto,
    responses(
        (status = 200, description = "Job updated", body = JobDto),
        (status = 400, description = "Invalid field", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_job(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
    Json(changes): Json<UpdateJobDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let job = JobService::new(&state.db, &state.integrations)
        .update(job_id, changes)
        .await?;

    Ok((StatusCode::OK, Json(job)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    tag = JOB_TAG,
    params(("id" = i32, Path, description = "Job id")),
    responses(
        (status = 204, description = "Job deleted with assignments, files and messages"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_job(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    JobService::new(&state.db, &state.integrations)
        .delete(job_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Assigns a pilot to a job and notifies them
#[utoipa::path(
    post,
    path = "/api/jobs/{id}/assignments",
    tag = JOB_TAG,
    params(("id" = i32, Path, description = "Job id")),
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Pilot assigned", body = AssignmentDto),
        (status = 400, description = "Pilot inactive or negative pay", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Job or pilot not found", body = ErrorDto),
        (status = 409, description = "Pilot already assigned", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn assign_pilot(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
    Json(assignment): Json<CreateAssignmentDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let assignment = JobService::new(&state.db, &state.integrations)
        .assign(job_id, assignment)
        .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Changes an assignment's status; pilots may only accept or decline their own
#[utoipa::path(
    patch,
    path = "/api/jobs/{id}/assignments/{pilot_id}",
    tag = JOB_TAG,
    params(
        ("id" = i32, Path, description = "Job id"),
        ("pilot_id" = i32, Path, description = "Pilot id")
    ),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = AssignmentDto),
        (status = 403, description = "Not permitted for this assignment or status", body = ErrorDto),
        (status = 404, description = "Assignment not found", body = ErrorDto),
        (status = 409, description = "A pilot cannot change a completed assignment", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_assignment(
    State(state): State<AppState>,
    session: Session,
    Path((job_id, pilot_id)): Path<(i32, i32)>,
    Json(changes): Json<UpdateAssignmentDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let assignment = JobService::new(&state.db, &state.integrations)
        .update_assignment(&user, job_id, pilot_id, changes.status)
        .await?;

    Ok((StatusCode::OK, Json(assignment)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}/assignments/{pilot_id}",
    tag = JOB_TAG,
    params(
        ("id" = i32, Path, description = "Job id"),
        ("pilot_id" = i32, Path, description = "Pilot id")
    ),
    responses(
        (status = 204, description = "Pilot unassigned"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Assignment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn unassign_pilot(
    State(state): State<AppState>,
    session: Session,
    Path((job_id, pilot_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    JobService::new(&state.db, &state.integrations)
        .unassign(job_id, pilot_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/files",
    tag = JOB_TAG,
    params(("id" = i32, Path, description = "Job id")),
    responses(
        (status = 200, description = "Files attached to the job", body = Vec<JobFileDto>),
        (status = 403, description = "Job not visible to the caller", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_job_files(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let files = JobService::new(&state.db, &state.integrations)
        .list_files(&user, job_id)
        .await?;

    Ok((StatusCode::OK, Json(files)))
}

/// Records metadata of a file stored elsewhere
#[utoipa::path(
    post,
    path = "/api/jobs/{id}/files",
    tag = JOB_TAG,
    params(("id" = i32, Path, description = "Job id")),
    request_body = CreateJobFileDto,
    responses(
        (status = 201, description = "File recorded", body = JobFileDto),
        (status = 400, description = "Missing name or URL", body = ErrorDto),
        (status = 403, description = "Client accounts or jobs not visible to the caller", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_job_file(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
    Json(file): Json<CreateJobFileDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let file = JobService::new(&state.db, &state.integrations)
        .add_file(&user, job_id, file)
        .await?;

    Ok((StatusCode::CREATED, Json(file)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}/files/{file_id}",
    tag = JOB_TAG,
    params(
        ("id" = i32, Path, description = "Job id"),
        ("file_id" = i32, Path, description = "File id")
    ),
    responses(
        (status = 204, description = "File record deleted"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "File not found on this job", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_job_file(
    State(state): State<AppState>,
    session: Session,
    Path((job_id, file_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    JobService::new(&state.db, &state.integrations)
        .delete_file(job_id, file_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Public job status by tracking token, no login required
#[utoipa::path(
    get,
    path = "/api/track/{token}",
    tag = JOB_TAG,
    params(("token" = String, Path, description = "Tracking token")),
    responses(
        (status = 200, description = "Job status without pricing", body = TrackingDto),
        (status = 404, description = "Unknown token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn track_job(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let tracking = JobService::new(&state.db, &state.integrations)
        .track(&token)
        .await?;

    Ok((StatusCode::OK, Json(tracking)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/export",
    tag = JOB_TAG,
    responses(
        (status = 200, description = "Jobs as CSV", body = String, content_type = "text/csv"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export_jobs(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let csv = CsvService::new(&state.db, &state.integrations)
        .export_jobs()
        .await?;

    Ok(attachment("jobs", csv))
}

/// Upserts jobs from CSV, matching on client, title and scheduled date
#[utoipa::path(
    post,
    path = "/api/jobs/import",
    tag = JOB_TAG,
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Import summary with per-row errors", body = ImportSummaryDto),
        (status = 400, description = "Unreadable CSV or missing title column", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn import_jobs(
    State(state): State<AppState>,
    session: Session,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let summary = CsvService::new(&state.db, &state.integrations)
        .import_jobs(&body)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}
