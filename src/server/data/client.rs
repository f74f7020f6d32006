use chrono::Utc;
use entity::sea_orm_active_enums::InvoiceStatus;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, ExprTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::{
    model::client::{CreateClientDto, UpdateClientDto},
    server::data::{contains_pattern, patch_text, text_or_none},
};

pub struct ClientRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ClientRepository<'a, C> {
    /// Creates a new instance of [`ClientRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, client: CreateClientDto) -> Result<entity::client::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let client = entity::client::ActiveModel {
            name: ActiveValue::Set(client.name.trim().to_string()),
            contact_name: ActiveValue::Set(text_or_none(client.contact_name)),
            email: ActiveValue::Set(text_or_none(client.email).map(|e| e.to_lowercase())),
            phone: ActiveValue::Set(text_or_none(client.phone)),
            address: ActiveValue::Set(text_or_none(client.address)),
            notes: ActiveValue::Set(text_or_none(client.notes)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        client.insert(self.db).await
    }

    pub async fn get(&self, client_id: i32) -> Result<Option<entity::client::Model>, DbErr> {
        entity::prelude::Client::find_by_id(client_id)
            .one(self.db)
            .await
    }

    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<entity::client::Model>, DbErr> {
        entity::prelude::Client::find()
            .filter(entity::client::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await
    }

    /// Finds a client without an email address by case-insensitive name
    pub async fn find_by_name_without_email(
        &self,
        name: &str,
    ) -> Result<Option<entity::client::Model>, DbErr> {
        let name = name.trim().to_lowercase();

        let clients = entity::prelude::Client::find()
            .filter(entity::client::Column::Email.is_null())
            .order_by_asc(entity::client::Column::Id)
            .all(self.db)
            .await?;

        Ok(clients
            .into_iter()
            .find(|client| client.name.to_lowercase() == name))
    }

    /// Lists clients ordered by name, optionally filtered by a case-insensitive match on
    /// name or email
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<entity::client::Model>, DbErr> {
        let mut query = entity::prelude::Client::find();

        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            let pattern = contains_pattern(search);

            query = query.filter(
                Condition::any()
                    .add(Func::lower(Expr::col(entity::client::Column::Name)).like(&pattern))
                    .add(Func::lower(Expr::col(entity::client::Column::Email)).like(&pattern)),
            );
        }

        query
            .order_by_asc(entity::client::Column::Name)
            .all(self.db)
            .await
    }

    /// Applies a partial update, returning `None` if the client does not exist
    pub async fn update(
        &self,
        client_id: i32,
        changes: UpdateClientDto,
    ) -> Result<Option<entity::client::Model>, DbErr> {
        let Some(client) = self.get(client_id).await? else {
            return Ok(None);
        };

        let mut client = client.into_active_model();
        if let Some(name) = changes.name {
            client.name = ActiveValue::Set(name.trim().to_string());
        }
        patch_text(&mut client.contact_name, changes.contact_name);
        patch_text(
            &mut client.email,
            changes.email.map(|e| e.to_lowercase()),
        );
        patch_text(&mut client.phone, changes.phone);
        patch_text(&mut client.address, changes.address);
        patch_text(&mut client.notes, changes.notes);
        client.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(client.update(self.db).await?))
    }

    /// Deletes a client along with its jobs, invoices and contracts
    ///
    /// Returns OK regardless of client existing, to confirm the deletion result
    /// check the [`DeleteResult::rows_affected`] field.
    pub async fn delete(&self, client_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Client::delete_by_id(client_id)
            .exec(self.db)
            .await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::Client::find().count(self.db).await
    }

    pub async fn job_count(&self, client_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Job::find()
            .filter(entity::job::Column::ClientId.eq(client_id))
            .count(self.db)
            .await
    }

    /// Sum of sent and overdue invoices for a client
    pub async fn outstanding_cents(&self, client_id: i32) -> Result<i64, DbErr> {
        let amounts = entity::prelude::Invoice::find()
            .select_only()
            .column(entity::invoice::Column::AmountCents)
            .filter(entity::invoice::Column::ClientId.eq(client_id))
            .filter(
                entity::invoice::Column::Status
                    .is_in([InvoiceStatus::Sent, InvoiceStatus::Overdue]),
            )
            .into_tuple::<i64>()
            .all(self.db)
            .await?;

        Ok(amounts.into_iter().sum())
    }
}
