use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::AssignmentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "job_assignment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub job_id: i32,
    pub pilot_id: i32,
    pub status: AssignmentStatus,
    pub pay_cents: i64,
    pub assigned_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job::Entity",
        from = "Column::JobId",
        to = "super::job::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Job,
    #[sea_orm(
        belongs_to = "super::pilot::Entity",
        from = "Column::PilotId",
        to = "super::pilot::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Pilot,
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::pilot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pilot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
