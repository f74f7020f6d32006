use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000002_pilot::Pilot;

static IDX_PILOT_AVAILABILITY_PILOT_DATE: &str = "idx-pilot_availability-pilot_id-date";
static FK_PILOT_AVAILABILITY_PILOT_ID: &str = "fk-pilot_availability-pilot_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PilotAvailability::Table)
                    .if_not_exists()
                    .col(pk_auto(PilotAvailability::Id))
                    .col(integer(PilotAvailability::PilotId))
                    .col(date(PilotAvailability::Date))
                    .col(boolean(PilotAvailability::Available))
                    .col(timestamp(PilotAvailability::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PILOT_AVAILABILITY_PILOT_ID)
                            .from(PilotAvailability::Table, PilotAvailability::PilotId)
                            .to(Pilot::Table, Pilot::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PILOT_AVAILABILITY_PILOT_DATE)
                    .table(PilotAvailability::Table)
                    .col(PilotAvailability::PilotId)
                    .col(PilotAvailability::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_PILOT_AVAILABILITY_PILOT_DATE)
                    .table(PilotAvailability::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PilotAvailability::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum PilotAvailability {
    Table,
    Id,
    PilotId,
    Date,
    Available,
    UpdatedAt,
}
