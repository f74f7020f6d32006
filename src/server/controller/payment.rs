use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        payment::{CreatePilotPaymentDto, PilotPaymentDto, UpdatePilotPaymentDto},
    },
    server::{
        controller::util::get_user::{get_back_office_user, get_user_from_session},
        error::Error,
        model::app::AppState,
        service::payment::PaymentService,
    },
};

pub static PAYMENT_TAG: &str = "payment";

#[utoipa::path(
    get,
    path = "/api/pilots/{id}/payments",
    tag = PAYMENT_TAG,
    params(("id" = i32, Path, description = "Pilot id")),
    responses(
        (status = 200, description = "Payouts, newest first", body = Vec<PilotPaymentDto>),
        (status = 403, description = "Another pilot's payouts", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_pilot_payments(
    State(state): State<AppState>,
    session: Session,
    Path(pilot_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let payments = PaymentService::new(&state.db)
        .list_for_pilot(&user, pilot_id)
        .await?;

    Ok((StatusCode::OK, Json(payments)))
}

#[utoipa::path(
    post,
    path = "/api/pilots/{id}/payments",
    tag = PAYMENT_TAG,
    params(("id" = i32, Path, description = "Pilot id")),
    request_body = CreatePilotPaymentDto,
    responses(
        (status = 201, description = "Pending payout recorded", body = PilotPaymentDto),
        (status = 400, description = "Non-positive amount or unknown job", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Pilot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_pilot_payment(
    State(state): State<AppState>,
    session: Session,
    Path(pilot_id): Path<i32>,
    Json(payment): Json<CreatePilotPaymentDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let payment = PaymentService::new(&state.db)
        .create(pilot_id, payment)
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    patch,
    path = "/api/payments/{id}",
    tag = PAYMENT_TAG,
    params(("id" = i32, Path, description = "Payment id")),
    request_body = UpdatePilotPaymentDto,
    responses(
        (status = 200, description = "Payout updated", body = PilotPaymentDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Payment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_pilot_payment(
    State(state): State<AppState>,
    session: Session,
    Path(payment_id): Path<i32>,
    Json(changes): Json<UpdatePilotPaymentDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let payment = PaymentService::new(&state.db)
        .update(payment_id, changes)
        .await?;

    Ok((StatusCode::OK, Json(payment)))
}
