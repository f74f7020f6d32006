use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    Json,
};
use entity::sea_orm_active_enums::StorageProvider;
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        job::JobFileDto,
        storage::{StorageCallbackParams, StorageFileDto, StorageFilesParams, UploadParams},
    },
    server::{
        controller::util::{csrf::validate_csrf, get_user::get_user_from_session},
        error::Error,
        integration::storage::provider_slug,
        model::{app::AppState, session::storage::SessionStorageCsrf},
        service::storage::{JobUpload, StorageService},
    },
};

pub static STORAGE_TAG: &str = "storage";

static DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Redirects to the provider's consent page to connect the user's storage account
#[utoipa::path(
    get,
    path = "/api/storage/{provider}/connect",
    tag = STORAGE_TAG,
    params(("provider" = String, Path, description = "google_drive or onedrive")),
    responses(
        (status = 307, description = "Redirect to the provider's consent page"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 503, description = "Provider not configured", body = ErrorDto)
    ),
)]
pub async fn connect_storage(
    State(state): State<AppState>,
    session: Session,
    Path(provider): Path<StorageProvider>,
) -> Result<impl IntoResponse, Error> {
    get_user_from_session(&state, &session).await?;

    let authorization =
        StorageService::new(&state.db, &state.integrations, &state.app_url).authorize(provider)?;

    SessionStorageCsrf::insert(&session, &authorization.state).await?;

    Ok(Redirect::temporary(&authorization.url))
}

/// OAuth callback storing the user's tokens, then back to the app's settings page
#[utoipa::path(
    get,
    path = "/api/storage/{provider}/callback",
    tag = STORAGE_TAG,
    params(
        ("provider" = String, Path, description = "google_drive or onedrive"),
        StorageCallbackParams
    ),
    responses(
        (status = 307, description = "Connected, redirect to the app"),
        (status = 400, description = "State mismatch", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 502, description = "Code exchange failed", body = ErrorDto),
        (status = 503, description = "Provider not configured", body = ErrorDto)
    ),
)]
pub async fn storage_callback(
    State(state): State<AppState>,
    session: Session,
    Path(provider): Path<StorageProvider>,
    Query(params): Query<StorageCallbackParams>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;
    validate_csrf(&session, &params.state).await?;

    StorageService::new(&state.db, &state.integrations, &state.app_url)
        .callback(user.id, provider, &params.code)
        .await?;

    Ok(Redirect::temporary(&format!(
        "{}/settings?storage={}",
        state.app_url,
        provider_slug(provider)
    )))
}

#[utoipa::path(
    get,
    path = "/api/storage/{provider}/files",
    tag = STORAGE_TAG,
    params(
        ("provider" = String, Path, description = "google_drive or onedrive"),
        StorageFilesParams
    ),
    responses(
        (status = 200, description = "Files in the folder", body = Vec<StorageFileDto>),
        (status = 400, description = "No account connected", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 502, description = "Provider request failed", body = ErrorDto),
        (status = 503, description = "Provider not configured", body = ErrorDto)
    ),
)]
pub async fn list_storage_files(
    State(state): State<AppState>,
    session: Session,
    Path(provider): Path<StorageProvider>,
    Query(params): Query<StorageFilesParams>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let files = StorageService::new(&state.db, &state.integrations, &state.app_url)
        .list_files(user.id, provider, params.folder.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(files)))
}

/// Uploads the request body to the user's connected storage and attaches it to the job
#[utoipa::path(
    post,
    path = "/api/jobs/{id}/files/upload",
    tag = STORAGE_TAG,
    params(("id" = i32, Path, description = "Job id"), UploadParams),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "File uploaded and attached", body = JobFileDto),
        (status = 400, description = "Blank name or no account connected", body = ErrorDto),
        (status = 403, description = "Client accounts or jobs not visible to the caller", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 502, description = "Upload failed", body = ErrorDto),
        (status = 503, description = "Provider not configured", body = ErrorDto)
    ),
)]
pub async fn upload_job_file(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let file = StorageService::new(&state.db, &state.integrations, &state.app_url)
        .upload_to_job(
            &user,
            job_id,
            JobUpload {
                provider: params.provider,
                name: params.name,
                folder: params.folder,
                content_type,
                body: body.to_vec(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(file)))
}
