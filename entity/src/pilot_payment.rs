use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::PilotPaymentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "pilot_payment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pilot_id: i32,
    pub job_id: Option<i32>,
    pub amount_cents: i64,
    pub status: PilotPaymentStatus,
    pub method: Option<String>,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime>,
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
        belongs_to = "super::job::Entity",
        from = "Column::JobId",
        to = "super::job::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Job,
}

impl Related<super::pilot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pilot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
