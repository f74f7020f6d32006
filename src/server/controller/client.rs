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
        client::{ClientDetailDto, ClientDto, ClientListParams, CreateClientDto, UpdateClientDto},
    },
    server::{
        controller::util::{
            csv::attachment,
            get_user::{get_admin_user, get_back_office_user, get_user_from_session},
        },
        error::Error,
        model::app::AppState,
        service::{client::ClientService, csv::CsvService},
    },
};

pub static CLIENT_TAG: &str = "client";

/// Lists clients, optionally filtered by name or email
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = CLIENT_TAG,
    params(ClientListParams),
    responses(
        (status = 200, description = "Clients ordered by name", body = Vec<ClientDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_clients(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ClientListParams>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let clients = ClientService::new(&state.db).list(&params).await?;

    Ok((StatusCode::OK, Json(clients)))
}

#[utoipa::path(
    post,
    path = "/api/clients",
    tag = CLIENT_TAG,
    request_body = CreateClientDto,
    responses(
        (status = 201, description = "Client created", body = ClientDto),
        (status = 400, description = "Missing name or invalid email", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 409, description = "Email already used by another client", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_client(
    State(state): State<AppState>,
    session: Session,
    Json(client): Json<CreateClientDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let client = ClientService::new(&state.db).create(client).await?;

    Ok((StatusCode::CREATED, Json(client)))
}

/// Returns a client with its job count and outstanding balance
///
/// Client accounts may only read their own record.
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = CLIENT_TAG,
    params(("id" = i32, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client detail", body = ClientDetailDto),
        (status = 403, description = "Another client's record", body = ErrorDto),
        (status = 404, description = "Client not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_client(
    State(state): State<AppState>,
    session: Session,
    Path(client_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;
    user.require_client_or_back_office(client_id)?;

    let client = ClientService::new(&state.db).get(client_id).await?;

    Ok((StatusCode::OK, Json(client)))
}

#[utoipa::path(
    patch,
    path = "/api/clients/{id}",
    tag = CLIENT_TAG,
    params(("id" = i32, Path, description = "Client id")),
    request_body = UpdateClientDto,
    responses(
        (status = 200, description = "Client updated", body = ClientDto),
        (status = 400, description = "Invalid field", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Client not found", body = ErrorDto),
        (status = 409, description = "Email already used by another client", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_client(
    State(state): State<AppState>,
    session: Session,
    Path(client_id): Path<i32>,
    Json(changes): Json<UpdateClientDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let client = ClientService::new(&state.db)
        .update(client_id, changes)
        .await?;

    Ok((StatusCode::OK, Json(client)))
}

/// Deletes a client with its jobs, invoices and contracts (admin only)
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = CLIENT_TAG,
    params(("id" = i32, Path, description = "Client id")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "Client not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_client(
    State(state): State<AppState>,
    session: Session,
    Path(client_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_admin_user(&state, &session).await?;

    ClientService::new(&state.db).delete(client_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/clients/export",
    tag = CLIENT_TAG,
    responses(
        (status = 200, description = "Clients as CSV", body = String, content_type = "text/csv"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export_clients(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let csv = CsvService::new(&state.db, &state.integrations)
        .export_clients()
        .await?;

    Ok(attachment("clients", csv))
}

/// Upserts clients from CSV, matching on email or, for clients without one, on name
#[utoipa::path(
    post,
    path = "/api/clients/import",
    tag = CLIENT_TAG,
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Import summary with per-row errors", body = ImportSummaryDto),
        (status = 400, description = "Unreadable CSV or missing name column", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn import_clients(
    State(state): State<AppState>,
    session: Session,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let summary = CsvService::new(&state.db, &state.integrations)
        .import_clients(&body)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}
