use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000001_client::Client;

static IDX_LEAD_EMAIL: &str = "idx-lead-email";
static FK_LEAD_CONVERTED_CLIENT_ID: &str = "fk-lead-converted_client_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lead::Table)
                    .if_not_exists()
                    .col(pk_auto(Lead::Id))
                    .col(string(Lead::Name))
                    .col(string_null(Lead::Company))
                    .col(string_null(Lead::Email))
                    .col(string_null(Lead::Phone))
                    .col(string_null(Lead::Source))
                    .col(string(Lead::Status).default("new"))
                    .col(big_integer(Lead::EstimatedValueCents).default(0))
                    .col(text_null(Lead::Notes))
                    .col(integer_null(Lead::ConvertedClientId))
                    .col(timestamp(Lead::CreatedAt))
                    .col(timestamp(Lead::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_LEAD_CONVERTED_CLIENT_ID)
                            .from(Lead::Table, Lead::ConvertedClientId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_LEAD_EMAIL)
                    .table(Lead::Table)
                    .col(Lead::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(IDX_LEAD_EMAIL).table(Lead::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Lead::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Lead {
    Table,
    Id,
    Name,
    Company,
    Email,
    Phone,
    Source,
    Status,
    EstimatedValueCents,
    Notes,
    ConvertedClientId,
    CreatedAt,
    UpdatedAt,
}
