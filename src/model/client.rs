use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientDto {
    pub id: i32,
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Client with the figures shown on its detail page
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientDetailDto {
    #[serde(flatten)]
    pub client: ClientDto,
    pub job_count: u64,
    /// Sum of invoices still awaiting payment (sent or overdue)
    pub outstanding_cents: i64,
}

#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct CreateClientDto {
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Partial update, absent fields are left untouched and an empty string clears an
/// optional field
#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct UpdateClientDto {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientListParams {
    /// Case-insensitive match on name or email
    pub search: Option<String>,
}
