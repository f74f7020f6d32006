use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::JobStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "job")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub client_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub location: Option<String>,
    pub scheduled_date: Option<Date>,
    pub status: JobStatus,
    pub price_cents: i64,
    #[sea_orm(unique)]
    pub tracking_token: String,
    pub completed_at: Option<DateTime>,
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
    #[sea_orm(has_many = "super::job_assignment::Entity")]
    JobAssignment,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::job_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
