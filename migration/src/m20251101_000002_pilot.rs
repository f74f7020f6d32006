use sea_orm_migration::{prelude::*, schema::*};

static IDX_PILOT_STATUS: &str = "idx-pilot-status";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pilot::Table)
                    .if_not_exists()
                    .col(pk_auto(Pilot::Id))
                    .col(string(Pilot::Name))
                    .col(string_uniq(Pilot::Email))
                    .col(string_null(Pilot::Phone))
                    .col(string(Pilot::Status).default("active"))
                    .col(string_null(Pilot::FaaCertNumber))
                    .col(date_null(Pilot::FaaCertExpiry))
                    .col(date_null(Pilot::InsuranceExpiry))
                    .col(big_integer(Pilot::HourlyRateCents).default(0))
                    .col(string_null(Pilot::HomeBase))
                    .col(timestamp(Pilot::CreatedAt))
                    .col(timestamp(Pilot::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PILOT_STATUS)
                    .table(Pilot::Table)
                    .col(Pilot::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_PILOT_STATUS)
                    .table(Pilot::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Pilot::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Pilot {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Status,
    FaaCertNumber,
    FaaCertExpiry,
    InsuranceExpiry,
    HourlyRateCents,
    HomeBase,
    CreatedAt,
    UpdatedAt,
}
