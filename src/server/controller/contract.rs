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
        contract::{
            ContractDto, ContractListParams, CreateContractDto, SendContractDto,
            UpdateContractDto,
        },
    },
    server::{
        controller::util::{
            csv::attachment,
            get_user::{get_back_office_user, get_user_from_session},
        },
        error::Error,
        model::app::AppState,
        service::{contract::ContractService, csv::CsvService},
    },
};

pub static CONTRACT_TAG: &str = "contract";

#[utoipa::path(
    get,
    path = "/api/contracts",
    tag = CONTRACT_TAG,
    params(ContractListParams),
    responses(
        (status = 200, description = "Contracts, newest first", body = Vec<ContractDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Pilot accounts", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_contracts(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ContractListParams>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let contracts = ContractService::new(&state.db, &state.integrations)
        .list(&user, params)
        .await?;

    Ok((StatusCode::OK, Json(contracts)))
}

/// Creates a draft contract
#[utoipa::path(
    post,
    path = "/api/contracts",
    tag = CONTRACT_TAG,
    request_body = CreateContractDto,
    responses(
        (status = 201, description = "Draft contract created", body = ContractDto),
        (status = 400, description = "Missing title, bad signer email or unknown client", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_contract(
    State(state): State<AppState>,
    session: Session,
    Json(contract): Json<CreateContractDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let contract = ContractService::new(&state.db, &state.integrations)
        .create(contract)
        .await?;

    Ok((StatusCode::CREATED, Json(contract)))
}

#[utoipa::path(
    get,
    path = "/api/contracts/{id}",
    tag = CONTRACT_TAG,
    params(("id" = i32, Path, description = "Contract id")),
    responses(
        (status = 200, description = "Contract", body = ContractDto),
        (status = 403, description = "Contract of another client", body = ErrorDto),
        (status = 404, description = "Contract not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_contract(
    State(state): State<AppState>,
    session: Session,
    Path(contract_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let contract = ContractService::new(&state.db, &state.integrations)
        .get(&user, contract_id)
        .await?;

    Ok((StatusCode::OK, Json(contract)))
}

#[utoipa::path(
    patch,
    path = "/api/contracts/{id}",
    tag = CONTRACT_TAG,
    params(("id" = i32, Path, description = "Contract id")),
    request_body = UpdateContractDto,
    responses(
        (status = 200, description = "Contract updated", body = ContractDto),
        (status = 400, description = "Invalid field", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Contract not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_contract(
    State(state): State<AppState>,
    session: Session,
    Path(contract_id): Path<i32>,
    Json(changes): Json<UpdateContractDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let contract = ContractService::new(&state.db, &state.integrations)
        .update(contract_id, changes)
        .await?;

    Ok((StatusCode::OK, Json(contract)))
}

#[utoipa::path(
    delete,
    path = "/api/contracts/{id}",
    tag = CONTRACT_TAG,
    params(("id" = i32, Path, description = "Contract id")),
    responses(
        (status = 204, description = "Contract deleted"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Contract not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_contract(
    State(state): State<AppState>,
    session: Session,
    Path(contract_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    ContractService::new(&state.db, &state.integrations)
        .delete(contract_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Sends the contract's document out for signature through the chosen provider
#[utoipa::path(
    post,
    path = "/api/contracts/{id}/send",
    tag = CONTRACT_TAG,
    params(("id" = i32, Path, description = "Contract id")),
    request_body = SendContractDto,
    responses(
        (status = 200, description = "Contract sent", body = ContractDto),
        (status = 400, description = "No document URL or signer email", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Contract not found", body = ErrorDto),
        (status = 502, description = "Provider request failed", body = ErrorDto),
        (status = 503, description = "Provider not configured", body = ErrorDto)
    ),
)]
pub async fn send_contract(
    State(state): State<AppState>,
    session: Session,
    Path(contract_id): Path<i32>,
    Json(send): Json<SendContractDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let contract = ContractService::new(&state.db, &state.integrations)
        .send(contract_id, send.provider)
        .await?;

    Ok((StatusCode::OK, Json(contract)))
}

#[utoipa::path(
    get,
    path = "/api/contracts/export",
    tag = CONTRACT_TAG,
    responses(
        (status = 200, description = "Contracts as CSV", body = String, content_type = "text/csv"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export_contracts(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let csv = CsvService::new(&state.db, &state.integrations)
        .export_contracts()
        .await?;

    Ok(attachment("contracts", csv))
}
