use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{ContractStatus, EsignProvider};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "contract")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub client_id: i32,
    pub title: String,
    pub status: ContractStatus,
    pub provider: Option<EsignProvider>,
    pub external_id: Option<String>,
    pub document_url: Option<String>,
    pub signer_name: Option<String>,
    pub signer_email: Option<String>,
    pub value_cents: i64,
    pub sent_at: Option<DateTime>,
    pub signed_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
