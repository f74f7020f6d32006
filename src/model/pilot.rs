use chrono::{NaiveDate, NaiveDateTime};
use entity::sea_orm_active_enums::PilotStatus;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PilotDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[schema(value_type = String, example = "active")]
    pub status: PilotStatus,
    pub faa_cert_number: Option<String>,
    pub faa_cert_expiry: Option<NaiveDate>,
    pub insurance_expiry: Option<NaiveDate>,
    pub hourly_rate_cents: i64,
    pub home_base: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct CreatePilotDto {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<PilotStatus>,
    pub faa_cert_number: Option<String>,
    pub faa_cert_expiry: Option<NaiveDate>,
    pub insurance_expiry: Option<NaiveDate>,
    pub hourly_rate_cents: Option<i64>,
    pub home_base: Option<String>,
}

#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePilotDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<PilotStatus>,
    pub faa_cert_number: Option<String>,
    pub faa_cert_expiry: Option<NaiveDate>,
    pub insurance_expiry: Option<NaiveDate>,
    pub hourly_rate_cents: Option<i64>,
    pub home_base: Option<String>,
}

#[derive(Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PilotListParams {
    #[param(value_type = Option<String>)]
    pub status: Option<PilotStatus>,
}

/// Quality score with the sub-scores it was built from, each on a 0-5 scale
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PilotScoreDto {
    pub pilot_id: i32,
    pub score: f64,
    pub completion: f64,
    pub compliance: f64,
    pub faa: f64,
    pub insurance: f64,
    pub total_assignments: u64,
    pub completed_assignments: u64,
    pub total_docs: u64,
    pub approved_docs: u64,
}
