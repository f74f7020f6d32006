use chrono::{NaiveDate, NaiveDateTime};
use entity::sea_orm_active_enums::InvoiceStatus;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoiceDto {
    pub id: i32,
    pub invoice_number: String,
    pub client_id: i32,
    pub job_id: Option<i32>,
    pub amount_cents: i64,
    #[schema(value_type = String, example = "sent")]
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub paid_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct CreateInvoiceDto {
    pub client_id: i32,
    pub job_id: Option<i32>,
    pub amount_cents: i64,
    #[schema(value_type = Option<String>)]
    pub status: Option<InvoiceStatus>,
    /// Defaults to today
    pub issue_date: Option<NaiveDate>,
    /// Defaults to 30 days after the issue date
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct UpdateInvoiceDto {
    pub job_id: Option<i32>,
    pub amount_cents: Option<i64>,
    #[schema(value_type = Option<String>)]
    pub status: Option<InvoiceStatus>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoiceListParams {
    #[param(value_type = Option<String>)]
    pub status: Option<InvoiceStatus>,
    pub client_id: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutDto {
    pub session_id: String,
    pub url: String,
}
