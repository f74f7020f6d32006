use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::LeadStatus;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::client::ClientDto;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LeadDto {
    pub id: i32,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    #[schema(value_type = String, example = "new")]
    pub status: LeadStatus,
    pub estimated_value_cents: i64,
    pub notes: Option<String>,
    pub converted_client_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct CreateLeadDto {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<LeadStatus>,
    pub estimated_value_cents: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct UpdateLeadDto {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<LeadStatus>,
    pub estimated_value_cents: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeadListParams {
    #[param(value_type = Option<String>)]
    pub status: Option<LeadStatus>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LeadConversionDto {
    pub lead: LeadDto,
    pub client: ClientDto,
}
