use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000002_pilot::Pilot, m20251101_000004_job::Job};

static IDX_PILOT_PAYMENT_PILOT_ID: &str = "idx-pilot_payment-pilot_id";
static FK_PILOT_PAYMENT_PILOT_ID: &str = "fk-pilot_payment-pilot_id";
static FK_PILOT_PAYMENT_JOB_ID: &str = "fk-pilot_payment-job_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PilotPayment::Table)
                    .if_not_exists()
                    .col(pk_auto(PilotPayment::Id))
                    .col(integer(PilotPayment::PilotId))
                    .col(integer_null(PilotPayment::JobId))
                    .col(big_integer(PilotPayment::AmountCents))
                    .col(string(PilotPayment::Status).default("pending"))
                    .col(string_null(PilotPayment::Method))
                    .col(string_null(PilotPayment::Reference))
                    .col(timestamp_null(PilotPayment::PaidAt))
                    .col(timestamp(PilotPayment::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PILOT_PAYMENT_PILOT_ID)
                            .from(PilotPayment::Table, PilotPayment::PilotId)
                            .to(Pilot::Table, Pilot::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PILOT_PAYMENT_JOB_ID)
                            .from(PilotPayment::Table, PilotPayment::JobId)
                            .to(Job::Table, Job::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PILOT_PAYMENT_PILOT_ID)
                    .table(PilotPayment::Table)
                    .col(PilotPayment::PilotId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_PILOT_PAYMENT_PILOT_ID)
                    .table(PilotPayment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PilotPayment::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum PilotPayment {
    Table,
    Id,
    PilotId,
    JobId,
    AmountCents,
    Status,
    Method,
    Reference,
    PaidAt,
    CreatedAt,
}
