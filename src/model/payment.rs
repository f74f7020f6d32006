use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::PilotPaymentStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PilotPaymentDto {
    pub id: i32,
    pub pilot_id: i32,
    pub job_id: Option<i32>,
    pub amount_cents: i64,
    #[schema(value_type = String, example = "pending")]
    pub status: PilotPaymentStatus,
    pub method: Option<String>,
    pub reference: Option<String>,
    pub paid_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct CreatePilotPaymentDto {
    pub job_id: Option<i32>,
    pub amount_cents: i64,
    pub method: Option<String>,
    pub reference: Option<String>,
}

#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePilotPaymentDto {
    #[schema(value_type = Option<String>)]
    pub status: Option<PilotPaymentStatus>,
    pub method: Option<String>,
    pub reference: Option<String>,
}
