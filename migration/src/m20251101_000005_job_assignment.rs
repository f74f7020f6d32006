use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000002_pilot::Pilot, m20251101_000004_job::Job};

static IDX_JOB_ASSIGNMENT_JOB_PILOT: &str = "idx-job_assignment-job_id-pilot_id";
static IDX_JOB_ASSIGNMENT_PILOT_ID: &str = "idx-job_assignment-pilot_id";
static FK_JOB_ASSIGNMENT_JOB_ID: &str = "fk-job_assignment-job_id";
static FK_JOB_ASSIGNMENT_PILOT_ID: &str = "fk-job_assignment-pilot_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobAssignment::Table)
                    .if_not_exists()
                    .col(pk_auto(JobAssignment::Id))
                    .col(integer(JobAssignment::JobId))
                    .col(integer(JobAssignment::PilotId))
                    .col(string(JobAssignment::Status).default("assigned"))
                    .col(big_integer(JobAssignment::PayCents).default(0))
                    .col(timestamp(JobAssignment::AssignedAt))
                    .col(timestamp(JobAssignment::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_JOB_ASSIGNMENT_JOB_ID)
                            .from(JobAssignment::Table, JobAssignment::JobId)
                            .to(Job::Table, Job::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_JOB_ASSIGNMENT_PILOT_ID)
                            .from(JobAssignment::Table, JobAssignment::PilotId)
                            .to(Pilot::Table, Pilot::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_JOB_ASSIGNMENT_JOB_PILOT)
                    .table(JobAssignment::Table)
                    .col(JobAssignment::JobId)
                    .col(JobAssignment::PilotId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_JOB_ASSIGNMENT_PILOT_ID)
                    .table(JobAssignment::Table)
                    .col(JobAssignment::PilotId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_JOB_ASSIGNMENT_PILOT_ID)
                    .table(JobAssignment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_JOB_ASSIGNMENT_JOB_PILOT)
                    .table(JobAssignment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(JobAssignment::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum JobAssignment {
    Table,
    Id,
    JobId,
    PilotId,
    Status,
    PayCents,
    AssignedAt,
    UpdatedAt,
}
