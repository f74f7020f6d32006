use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000003_hangar_user::HangarUser, m20251101_000004_job::Job};

static IDX_MESSAGE_JOB_ID: &str = "idx-message-job_id";
static FK_MESSAGE_JOB_ID: &str = "fk-message-job_id";
static FK_MESSAGE_SENDER_ID: &str = "fk-message-sender_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Message::Table)
                    .if_not_exists()
                    .col(pk_auto(Message::Id))
                    .col(integer(Message::JobId))
                    .col(integer(Message::SenderId))
                    .col(text(Message::Body))
                    .col(timestamp(Message::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MESSAGE_JOB_ID)
                            .from(Message::Table, Message::JobId)
                            .to(Job::Table, Job::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MESSAGE_SENDER_ID)
                            .from(Message::Table, Message::SenderId)
                            .to(HangarUser::Table, HangarUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MESSAGE_JOB_ID)
                    .table(Message::Table)
                    .col(Message::JobId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MESSAGE_JOB_ID)
                    .table(Message::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Message::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Message {
    Table,
    Id,
    JobId,
    SenderId,
    Body,
    CreatedAt,
}
