use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{ComplianceDocType, ComplianceStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "compliance_doc")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pilot_id: i32,
    pub doc_type: ComplianceDocType,
    pub file_url: Option<String>,
    pub expires_on: Option<Date>,
    pub status: ComplianceStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pilot::Entity",
        from = "Column::PilotId",
        to = "super::pilot::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Pilot,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReviewedBy",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Reviewer,
}

impl Related<super::pilot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pilot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
