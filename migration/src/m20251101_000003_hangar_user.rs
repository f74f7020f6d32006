use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000001_client::Client, m20251101_000002_pilot::Pilot};

static FK_USER_PILOT_ID: &str = "fk-hangar_user-pilot_id";
static FK_USER_CLIENT_ID: &str = "fk-hangar_user-client_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HangarUser::Table)
                    .if_not_exists()
                    .col(pk_auto(HangarUser::Id))
                    .col(string_uniq(HangarUser::Email))
                    .col(string(HangarUser::Name))
                    .col(string(HangarUser::PasswordHash))
                    .col(string(HangarUser::Role))
                    .col(integer_null(HangarUser::PilotId))
                    .col(integer_null(HangarUser::ClientId))
                    .col(timestamp(HangarUser::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_USER_PILOT_ID)
                            .from(HangarUser::Table, HangarUser::PilotId)
                            .to(Pilot::Table, Pilot::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_USER_CLIENT_ID)
                            .from(HangarUser::Table, HangarUser::ClientId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HangarUser::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum HangarUser {
    Table,
    Id,
    Email,
    Name,
    PasswordHash,
    Role,
    PilotId,
    ClientId,
    CreatedAt,
}
