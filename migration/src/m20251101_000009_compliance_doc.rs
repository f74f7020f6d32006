use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000002_pilot::Pilot, m20251101_000003_hangar_user::HangarUser};

static IDX_COMPLIANCE_DOC_PILOT_ID: &str = "idx-compliance_doc-pilot_id";
static IDX_COMPLIANCE_DOC_EXPIRES_ON: &str = "idx-compliance_doc-expires_on";
static FK_COMPLIANCE_DOC_PILOT_ID: &str = "fk-compliance_doc-pilot_id";
static FK_COMPLIANCE_DOC_REVIEWED_BY: &str = "fk-compliance_doc-reviewed_by";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ComplianceDoc::Table)
                    .if_not_exists()
                    .col(pk_auto(ComplianceDoc::Id))
                    .col(integer(ComplianceDoc::PilotId))
                    .col(string(ComplianceDoc::DocType))
                    .col(string_null(ComplianceDoc::FileUrl))
                    .col(date_null(ComplianceDoc::ExpiresOn))
                    .col(string(ComplianceDoc::Status).default("pending"))
                    .col(text_null(ComplianceDoc::Notes))
                    .col(integer_null(ComplianceDoc::ReviewedBy))
                    .col(timestamp_null(ComplianceDoc::ReviewedAt))
                    .col(timestamp(ComplianceDoc::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_COMPLIANCE_DOC_PILOT_ID)
                            .from(ComplianceDoc::Table, ComplianceDoc::PilotId)
                            .to(Pilot::Table, Pilot::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_COMPLIANCE_DOC_REVIEWED_BY)
                            .from(ComplianceDoc::Table, ComplianceDoc::ReviewedBy)
                            .to(HangarUser::Table, HangarUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_COMPLIANCE_DOC_PILOT_ID)
                    .table(ComplianceDoc::Table)
                    .col(ComplianceDoc::PilotId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_COMPLIANCE_DOC_EXPIRES_ON)
                    .table(ComplianceDoc::Table)
                    .col(ComplianceDoc::ExpiresOn)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_COMPLIANCE_DOC_EXPIRES_ON)
                    .table(ComplianceDoc::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_COMPLIANCE_DOC_PILOT_ID)
                    .table(ComplianceDoc::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ComplianceDoc::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ComplianceDoc {
    Table,
    Id,
    PilotId,
    DocType,
    FileUrl,
    ExpiresOn,
    Status,
    Notes,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
}
