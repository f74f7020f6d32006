use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000002_pilot::Pilot;

static FK_W9_FORM_PILOT_ID: &str = "fk-w9_form-pilot_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(W9Form::Table)
                    .if_not_exists()
                    .col(pk_auto(W9Form::Id))
                    .col(integer_uniq(W9Form::PilotId))
                    .col(string(W9Form::LegalName))
                    .col(string_null(W9Form::BusinessName))
                    .col(string(W9Form::TaxClassification))
                    .col(string_len(W9Form::TinLast4, 4))
                    .col(string(W9Form::Address))
                    .col(timestamp(W9Form::SignedAt))
                    .col(timestamp(W9Form::CreatedAt))
                    .col(timestamp(W9Form::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_W9_FORM_PILOT_ID)
                            .from(W9Form::Table, W9Form::PilotId)
                            .to(Pilot::Table, Pilot::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(W9Form::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum W9Form {
    #[sea_orm(iden = "w9_form")]
    Table,
    Id,
    PilotId,
    LegalName,
    BusinessName,
    TaxClassification,
    #[sea_orm(iden = "tin_last4")]
    TinLast4,
    Address,
    SignedAt,
    CreatedAt,
    UpdatedAt,
}
