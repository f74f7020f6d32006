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
        invoice::{CheckoutDto, CreateInvoiceDto, InvoiceDto, InvoiceListParams, UpdateInvoiceDto},
    },
    server::{
        controller::util::{
            csv::attachment,
            get_user::{get_back_office_user, get_user_from_session},
        },
        error::Error,
        model::app::AppState,
        service::{csv::CsvService, invoice::InvoiceService},
    },
};

pub static INVOICE_TAG: &str = "invoice";

/// Lists invoices, client accounts only seeing their own
#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = INVOICE_TAG,
    params(InvoiceListParams),
    responses(
        (status = 200, description = "Invoices, newest first", body = Vec<InvoiceDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Pilot accounts", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<InvoiceListParams>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let invoices = InvoiceService::new(&state.db, &state.integrations)
        .list(&user, params)
        .await?;

    Ok((StatusCode::OK, Json(invoices)))
}

/// Creates an invoice numbered `INV-{year}-{sequence}` by its issue year
#[utoipa::path(
    post,
    path = "/api/invoices",
    tag = INVOICE_TAG,
    request_body = CreateInvoiceDto,
    responses(
        (status = 201, description = "Invoice created", body = InvoiceDto),
        (status = 400, description = "Non-positive amount, due before issue or unknown client/job", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    session: Session,
    Json(invoice): Json<CreateInvoiceDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let invoice = InvoiceService::new(&state.db, &state.integrations)
        .create(invoice)
        .await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = INVOICE_TAG,
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice", body = InvoiceDto),
        (status = 403, description = "Invoice of another client", body = ErrorDto),
        (status = 404, description = "Invoice not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    session: Session,
    Path(invoice_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let invoice = InvoiceService::new(&state.db, &state.integrations)
        .get(&user, invoice_id)
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

#[utoipa::path(
    patch,
    path = "/api/invoices/{id}",
    tag = INVOICE_TAG,
    params(("id" = i32, Path, description = "Invoice id")),
    request_body = UpdateInvoiceDto,
    responses(
        (status = 200, description = "Invoice updated", body = InvoiceDto),
        (status = 400, description = "Invalid amount or dates", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Invoice not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_invoice(
    State(state): State<AppState>,
    session: Session,
    Path(invoice_id): Path<i32>,
    Json(changes): Json<UpdateInvoiceDto>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let invoice = InvoiceService::new(&state.db, &state.integrations)
        .update(invoice_id, changes)
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

#[utoipa::path(
    delete,
    path = "/api/invoices/{id}",
    tag = INVOICE_TAG,
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 204, description = "Invoice deleted"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 404, description = "Invoice not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    session: Session,
    Path(invoice_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    InvoiceService::new(&state.db, &state.integrations)
        .delete(invoice_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Starts a Stripe Checkout session for paying the invoice
///
/// The invoice is marked paid once Stripe reports the completed session through the
/// webhook, not when the session is created.
#[utoipa::path(
    post,
    path = "/api/invoices/{id}/checkout",
    tag = INVOICE_TAG,
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Checkout session to redirect the payer to", body = CheckoutDto),
        (status = 400, description = "Invoice already paid or void", body = ErrorDto),
        (status = 403, description = "Invoice of another client", body = ErrorDto),
        (status = 404, description = "Invoice not found", body = ErrorDto),
        (status = 502, description = "Stripe request failed", body = ErrorDto),
        (status = 503, description = "Stripe not configured", body = ErrorDto)
    ),
)]
pub async fn checkout_invoice(
    State(state): State<AppState>,
    session: Session,
    Path(invoice_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let checkout = InvoiceService::new(&state.db, &state.integrations)
        .checkout(&user, invoice_id, &state.app_url)
        .await?;

    Ok((StatusCode::OK, Json(checkout)))
}

#[utoipa::path(
    get,
    path = "/api/invoices/export",
    tag = INVOICE_TAG,
    responses(
        (status = 200, description = "Invoices as CSV", body = String, content_type = "text/csv"),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export_invoices(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let csv = CsvService::new(&state.db, &state.integrations)
        .export_invoices()
        .await?;

    Ok(attachment("invoices", csv))
}

/// Upserts invoices from CSV keyed on invoice number; rows without a number get a new one
#[utoipa::path(
    post,
    path = "/api/invoices/import",
    tag = INVOICE_TAG,
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Import summary with per-row errors", body = ImportSummaryDto),
        (status = 400, description = "Unreadable CSV or missing required column", body = ErrorDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn import_invoices(
    State(state): State<AppState>,
    session: Session,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let summary = CsvService::new(&state.db, &state.integrations)
        .import_invoices(&body)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}
