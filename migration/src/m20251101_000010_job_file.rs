use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000003_hangar_user::HangarUser, m20251101_000004_job::Job};

static IDX_JOB_FILE_JOB_ID: &str = "idx-job_file-job_id";
static FK_JOB_FILE_JOB_ID: &str = "fk-job_file-job_id";
static FK_JOB_FILE_UPLOADED_BY: &str = "fk-job_file-uploaded_by";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobFile::Table)
                    .if_not_exists()
                    .col(pk_auto(JobFile::Id))
                    .col(integer(JobFile::JobId))
                    .col(string(JobFile::FileName))
                    .col(string(JobFile::Url))
                    .col(string_null(JobFile::ContentType))
                    .col(big_integer_null(JobFile::SizeBytes))
                    .col(string_null(JobFile::Provider))
                    .col(string_null(JobFile::ExternalId))
                    .col(integer_null(JobFile::UploadedBy))
                    .col(timestamp(JobFile::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_JOB_FILE_JOB_ID)
                            .from(JobFile::Table, JobFile::JobId)
                            .to(Job::Table, Job::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_JOB_FILE_UPLOADED_BY)
                            .from(JobFile::Table, JobFile::UploadedBy)
                            .to(HangarUser::Table, HangarUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_JOB_FILE_JOB_ID)
                    .table(JobFile::Table)
                    .col(JobFile::JobId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_JOB_FILE_JOB_ID)
                    .table(JobFile::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(JobFile::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum JobFile {
    Table,
    Id,
    JobId,
    FileName,
    Url,
    ContentType,
    SizeBytes,
    Provider,
    ExternalId,
    UploadedBy,
    CreatedAt,
}
