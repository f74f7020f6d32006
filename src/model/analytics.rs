use entity::sea_orm_active_enums::JobStatus;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardDto {
    pub client_count: u64,
    pub active_pilot_count: u64,
    /// Leads not yet won or lost
    pub open_lead_count: u64,
    pub jobs_by_status: Vec<JobStatusCountDto>,
    pub revenue_month_cents: i64,
    pub revenue_year_cents: i64,
    pub outstanding_cents: i64,
    pub pending_payouts_cents: i64,
    pub docs_pending_review: u64,
    pub docs_expiring_soon: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct JobStatusCountDto {
    #[schema(value_type = String)]
    pub status: JobStatus,
    pub count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ForecastDto {
    pub year: i32,
    pub months: Vec<ForecastMonthDto>,
    /// Revenue change per month from the least-squares fit
    pub slope: f64,
    pub intercept: f64,
    pub actual_total_cents: i64,
    /// Actual revenue so far plus the projected remainder of the year
    pub projected_total_cents: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastMonthDto {
    /// Month of the year, 1-12
    pub month: u32,
    pub revenue_cents: i64,
    pub projected: bool,
}

#[derive(Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ForecastParams {
    /// Defaults to the current year
    pub year: Option<i32>,
}
