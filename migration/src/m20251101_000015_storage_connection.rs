use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000003_hangar_user::HangarUser;

static IDX_STORAGE_CONNECTION_USER_PROVIDER: &str = "idx-storage_connection-user_id-provider";
static FK_STORAGE_CONNECTION_USER_ID: &str = "fk-storage_connection-user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StorageConnection::Table)
                    .if_not_exists()
                    .col(pk_auto(StorageConnection::Id))
                    .col(integer(StorageConnection::UserId))
                    .col(string(StorageConnection::Provider))
                    .col(text(StorageConnection::AccessToken))
                    .col(text_null(StorageConnection::RefreshToken))
                    .col(timestamp_null(StorageConnection::ExpiresAt))
                    .col(timestamp(StorageConnection::CreatedAt))
                    .col(timestamp(StorageConnection::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_STORAGE_CONNECTION_USER_ID)
                            .from(StorageConnection::Table, StorageConnection::UserId)
                            .to(HangarUser::Table, HangarUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_STORAGE_CONNECTION_USER_PROVIDER)
                    .table(StorageConnection::Table)
                    .col(StorageConnection::UserId)
                    .col(StorageConnection::Provider)
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
                    .name(IDX_STORAGE_CONNECTION_USER_PROVIDER)
                    .table(StorageConnection::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(StorageConnection::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum StorageConnection {
    Table,
    Id,
    UserId,
    Provider,
    AccessToken,
    RefreshToken,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}
