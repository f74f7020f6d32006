use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000001_client::Client;

static IDX_CONTRACT_EXTERNAL_ID: &str = "idx-contract-external_id";
static FK_CONTRACT_CLIENT_ID: &str = "fk-contract-client_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contract::Table)
                    .if_not_exists()
                    .col(pk_auto(Contract::Id))
                    .col(integer(Contract::ClientId))
                    .col(string(Contract::Title))
                    .col(string(Contract::Status).default("draft"))
                    .col(string_null(Contract::Provider))
                    .col(string_null(Contract::ExternalId))
                    .col(string_null(Contract::DocumentUrl))
                    .col(string_null(Contract::SignerName))
                    .col(string_null(Contract::SignerEmail))
                    .col(big_integer(Contract::ValueCents).default(0))
                    .col(timestamp_null(Contract::SentAt))
                    .col(timestamp_null(Contract::SignedAt))
                    .col(timestamp(Contract::CreatedAt))
                    .col(timestamp(Contract::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CONTRACT_CLIENT_ID)
                            .from(Contract::Table, Contract::ClientId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CONTRACT_EXTERNAL_ID)
                    .table(Contract::Table)
                    .col(Contract::ExternalId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CONTRACT_EXTERNAL_ID)
                    .table(Contract::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Contract::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Contract {
    Table,
    Id,
    ClientId,
    Title,
    Status,
    Provider,
    ExternalId,
    DocumentUrl,
    SignerName,
    SignerEmail,
    ValueCents,
    SentAt,
    SignedAt,
    CreatedAt,
    UpdatedAt,
}
