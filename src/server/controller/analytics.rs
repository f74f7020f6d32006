use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    model::{
        analytics::{DashboardDto, ForecastDto, ForecastParams},
        api::ErrorDto,
    },
    server::{
        controller::util::get_user::get_back_office_user, error::Error, model::app::AppState,
        service::analytics::AnalyticsService,
    },
};

pub static ANALYTICS_TAG: &str = "analytics";

#[utoipa::path(
    get,
    path = "/api/analytics/dashboard",
    tag = ANALYTICS_TAG,
    responses(
        (status = 200, description = "Operational totals as of today", body = DashboardDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let dashboard = AnalyticsService::new(&state.db)
        .dashboard(Utc::now().date_naive())
        .await?;

    Ok((StatusCode::OK, Json(dashboard)))
}

/// Monthly paid revenue for a year with the remaining months projected by linear fit
#[utoipa::path(
    get,
    path = "/api/analytics/forecast",
    tag = ANALYTICS_TAG,
    params(ForecastParams),
    responses(
        (status = 200, description = "Twelve months of actual or projected revenue", body = ForecastDto),
        (status = 403, description = "Not back office", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ForecastParams>,
) -> Result<impl IntoResponse, Error> {
    get_back_office_user(&state, &session).await?;

    let forecast = AnalyticsService::new(&state.db)
        .forecast(Utc::now().date_naive(), params.year)
        .await?;

    Ok((StatusCode::OK, Json(forecast)))
}
