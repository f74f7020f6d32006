use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::{ContractStatus, EsignProvider};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ContractDto {
    pub id: i32,
    pub client_id: i32,
    pub title: String,
    #[schema(value_type = String, example = "draft")]
    pub status: ContractStatus,
    #[schema(value_type = Option<String>)]
    pub provider: Option<EsignProvider>,
    pub external_id: Option<String>,
    pub document_url: Option<String>,
    pub signer_name: Option<String>,
    pub signer_email: Option<String>,
    pub value_cents: i64,
    pub sent_at: Option<NaiveDateTime>,
    pub signed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct CreateContractDto {
    pub client_id: i32,
    pub title: String,
    pub document_url: Option<String>,
    pub signer_name: Option<String>,
    pub signer_email: Option<String>,
    pub value_cents: Option<i64>,
}

#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct UpdateContractDto {
    pub title: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<ContractStatus>,
    pub document_url: Option<String>,
    pub signer_name: Option<String>,
    pub signer_email: Option<String>,
    pub value_cents: Option<i64>,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct SendContractDto {
    #[schema(value_type = String, example = "docusign")]
    pub provider: EsignProvider,
}

#[derive(Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContractListParams {
    #[param(value_type = Option<String>)]
    pub status: Option<ContractStatus>,
    pub client_id: Option<i32>,
}
