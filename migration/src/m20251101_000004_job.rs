use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000001_client::Client;

static IDX_JOB_CLIENT_ID: &str = "idx-job-client_id";
static IDX_JOB_SCHEDULED_DATE: &str = "idx-job-scheduled_date";
static FK_JOB_CLIENT_ID: &str = "fk-job-client_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Job::Table)
                    .if_not_exists()
                    .col(pk_auto(Job::Id))
                    .col(integer(Job::ClientId))
                    .col(string(Job::Title))
                    .col(text_null(Job::Description))
                    .col(string_null(Job::Location))
                    .col(date_null(Job::ScheduledDate))
                    .col(string(Job::Status).default("pending"))
                    .col(big_integer(Job::PriceCents).default(0))
                    .col(string_uniq(Job::TrackingToken))
                    .col(timestamp_null(Job::CompletedAt))
                    .col(timestamp(Job::CreatedAt))
                    .col(timestamp(Job::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_JOB_CLIENT_ID)
                            .from(Job::Table, Job::ClientId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_JOB_CLIENT_ID)
                    .table(Job::Table)
                    .col(Job::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_JOB_SCHEDULED_DATE)
                    .table(Job::Table)
                    .col(Job::ScheduledDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_JOB_SCHEDULED_DATE)
                    .table(Job::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_JOB_CLIENT_ID)
                    .table(Job::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Job::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Job {
    Table,
    Id,
    ClientId,
    Title,
    Description,
    Location,
    ScheduledDate,
    Status,
    PriceCents,
    TrackingToken,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}
