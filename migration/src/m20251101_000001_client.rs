use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Client::Table)
                    .if_not_exists()
                    .col(pk_auto(Client::Id))
                    .col(string(Client::Name))
                    .col(string_null(Client::ContactName))
                    .col(string_null(Client::Email).unique_key())
                    .col(string_null(Client::Phone))
                    .col(string_null(Client::Address))
                    .col(text_null(Client::Notes))
                    .col(timestamp(Client::CreatedAt))
                    .col(timestamp(Client::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Client::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Client {
    Table,
    Id,
    Name,
    ContactName,
    Email,
    Phone,
    Address,
    Notes,
    CreatedAt,
    UpdatedAt,
}
