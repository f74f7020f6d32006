use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::{
    model::{
        api::ErrorDto,
        webhook::{PandadocWebhookParams, WebhookAckDto},
    },
    server::{
        error::Error, integration::esign::adobe_sign::CLIENT_ID_HEADER, model::app::AppState,
        service::webhook::WebhookService,
    },
};

pub static WEBHOOK_TAG: &str = "webhook";

static STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";
static DOCUSIGN_SIGNATURE_HEADER: &str = "X-DocuSign-Signature-1";

fn header<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Stripe events; a completed Checkout session marks its invoice paid
#[utoipa::path(
    post,
    path = "/api/webhooks/stripe",
    tag = WEBHOOK_TAG,
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "Event accepted"),
        (status = 400, description = "Missing or invalid signature, or malformed event", body = ErrorDto),
        (status = 503, description = "Webhook secret not configured", body = ErrorDto)
    ),
)]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    WebhookService::new(&state.db, &state.integrations)
        .stripe(
            header(&headers, STRIPE_SIGNATURE_HEADER),
            &body,
            Utc::now().timestamp(),
        )
        .await?;

    Ok(StatusCode::OK)
}

/// DocuSign Connect envelope events, HMAC signed
#[utoipa::path(
    post,
    path = "/api/webhooks/docusign",
    tag = WEBHOOK_TAG,
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "Events applied", body = WebhookAckDto),
        (status = 400, description = "Missing or invalid signature, or malformed event", body = ErrorDto),
        (status = 503, description = "Connect key not configured", body = ErrorDto)
    ),
)]
pub async fn docusign_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    let applied = WebhookService::new(&state.db, &state.integrations)
        .docusign(header(&headers, DOCUSIGN_SIGNATURE_HEADER), &body)
        .await?;

    Ok((StatusCode::OK, Json(WebhookAckDto { applied })))
}

#[utoipa::path(
    post,
    path = "/api/webhooks/pandadoc",
    tag = WEBHOOK_TAG,
    params(PandadocWebhookParams),
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "Events applied", body = WebhookAckDto),
        (status = 400, description = "Missing or invalid signature, or malformed event", body = ErrorDto),
        (status = 503, description = "Webhook key not configured", body = ErrorDto)
    ),
)]
pub async fn pandadoc_webhook(
    State(state): State<AppState>,
    Query(params): Query<PandadocWebhookParams>,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    let applied = WebhookService::new(&state.db, &state.integrations)
        .pandadoc(params.signature.as_deref(), &body)
        .await?;

    Ok((StatusCode::OK, Json(WebhookAckDto { applied })))
}

/// Adobe Sign verification of intent
///
/// Adobe Sign calls the webhook URL with GET when the webhook is registered and only
/// activates it when the client id header is echoed back.
#[utoipa::path(
    get,
    path = "/api/webhooks/adobe-sign",
    tag = WEBHOOK_TAG,
    responses(
        (status = 200, description = "Client id echoed in the X-AdobeSign-ClientId header"),
        (status = 400, description = "Unknown client id", body = ErrorDto),
        (status = 503, description = "Adobe Sign not configured", body = ErrorDto)
    ),
)]
pub async fn adobe_sign_verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    let client_id = WebhookService::new(&state.db, &state.integrations)
        .adobe_sign_client_id(header(&headers, CLIENT_ID_HEADER))?;

    Ok((StatusCode::OK, [(CLIENT_ID_HEADER, client_id)]))
}

#[utoipa::path(
    post,
    path = "/api/webhooks/adobe-sign",
    tag = WEBHOOK_TAG,
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "Events applied, client id echoed", body = WebhookAckDto),
        (status = 400, description = "Unknown client id or malformed event", body = ErrorDto),
        (status = 503, description = "Adobe Sign not configured", body = ErrorDto)
    ),
)]
pub async fn adobe_sign_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    let service = WebhookService::new(&state.db, &state.integrations);
    let client_id_header = header(&headers, CLIENT_ID_HEADER);
    let applied = service.adobe_sign(client_id_header, &body).await?;

    Ok((
        StatusCode::OK,
        [(CLIENT_ID_HEADER, applied.client_id)],
        Json(WebhookAckDto {
            applied: applied.applied,
        }),
    ))
}
