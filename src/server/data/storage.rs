use chrono::{NaiveDateTime, Utc};
use entity::sea_orm_active_enums::StorageProvider;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};

pub struct StorageConnectionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

/// OAuth tokens as returned by a storage provider's token endpoint
pub struct StorageTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<NaiveDateTime>,
}

impl<'a, C: ConnectionTrait> StorageConnectionRepository<'a, C> {
    /// Creates a new instance of [`StorageConnectionRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(
        &self,
        user_id: i32,
        provider: StorageProvider,
    ) -> Result<Option<entity::storage_connection::Model>, DbErr> {
        entity::prelude::StorageConnection::find()
            .filter(entity::storage_connection::Column::UserId.eq(user_id))
            .filter(entity::storage_connection::Column::Provider.eq(provider))
            .one(self.db)
            .await
    }

    /// Stores a user's tokens for a provider, replacing an existing connection.
    ///
    /// A missing refresh token keeps the previously stored one, providers only issue
    /// it on first consent.
    pub async fn upsert(
        &self,
        user_id: i32,
        provider: StorageProvider,
        tokens: StorageTokens,
    ) -> Result<entity::storage_connection::Model, DbErr> {
        match self.get(user_id, provider).await? {
            Some(connection) => self.update_tokens(connection, tokens).await,
            None => {
                let now = Utc::now().naive_utc();

                entity::storage_connection::ActiveModel {
                    user_id: ActiveValue::Set(user_id),
                    provider: ActiveValue::Set(provider),
                    access_token: ActiveValue::Set(tokens.access_token),
                    refresh_token: ActiveValue::Set(tokens.refresh_token),
                    expires_at: ActiveValue::Set(tokens.expires_at),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(self.db)
                .await
            }
        }
    }

    pub async fn update_tokens(
        &self,
        connection: entity::storage_connection::Model,
        tokens: StorageTokens,
    ) -> Result<entity::storage_connection::Model, DbErr> {
        let mut connection = connection.into_active_model();
        connection.access_token = ActiveValue::Set(tokens.access_token);
        if tokens.refresh_token.is_some() {
            connection.refresh_token = ActiveValue::Set(tokens.refresh_token);
        }
        connection.expires_at = ActiveValue::Set(tokens.expires_at);
        connection.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        connection.update(self.db).await
    }
}
