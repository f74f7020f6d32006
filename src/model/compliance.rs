use chrono::{NaiveDate, NaiveDateTime};
use entity::sea_orm_active_enums::{ComplianceDocType, ComplianceStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ComplianceDocDto {
    pub id: i32,
    pub pilot_id: i32,
    #[schema(value_type = String, example = "faa_cert")]
    pub doc_type: ComplianceDocType,
    pub file_url: Option<String>,
    pub expires_on: Option<NaiveDate>,
    #[schema(value_type = String, example = "pending")]
    pub status: ComplianceStatus,
    pub notes: Option<String>,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct CreateComplianceDocDto {
    pub pilot_id: i32,
    #[schema(value_type = String)]
    pub doc_type: ComplianceDocType,
    pub file_url: Option<String>,
    pub expires_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct ReviewComplianceDocDto {
    #[schema(value_type = String, example = "approved")]
    pub status: ComplianceStatus,
    pub notes: Option<String>,
}

#[derive(Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ComplianceListParams {
    pub pilot_id: Option<i32>,
    #[param(value_type = Option<String>)]
    pub status: Option<ComplianceStatus>,
}

#[derive(Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpiringParams {
    /// Look-ahead window in days, defaults to 30
    pub days: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct W9Dto {
    pub pilot_id: i32,
    pub legal_name: String,
    pub business_name: Option<String>,
    pub tax_classification: String,
    /// Only the last four digits of the TIN are kept
    pub tin_last4: String,
    pub address: String,
    pub signed_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct SubmitW9Dto {
    pub legal_name: String,
    pub business_name: Option<String>,
    pub tax_classification: String,
    /// Full SSN or EIN, digits and dashes
    pub tin: String,
    pub address: String,
}
