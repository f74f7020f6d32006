use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::PilotStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "pilot")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub status: PilotStatus,
    pub faa_cert_number: Option<String>,
    pub faa_cert_expiry: Option<Date>,
    pub insurance_expiry: Option<Date>,
    pub hourly_rate_cents: i64,
    pub home_base: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::job_assignment::Entity")]
    JobAssignment,
    #[sea_orm(has_many = "super::compliance_doc::Entity")]
    ComplianceDoc,
}

impl Related<super::job_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobAssignment.def()
    }
}

impl Related<super::compliance_doc::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComplianceDoc.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
