use chrono::Utc;
use entity::sea_orm_active_enums::{ContractStatus, EsignProvider};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::{
    model::contract::{ContractListParams, CreateContractDto, UpdateContractDto},
    server::data::{patch_text, text_or_none},
};

pub struct ContractRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ContractRepository<'a, C> {
    /// Creates a new instance of [`ContractRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a new draft contract
    pub async fn create(
        &self,
        contract: CreateContractDto,
    ) -> Result<entity::contract::Model, DbErr> {
        let now = Utc::now().naive_utc();

        entity::contract::ActiveModel {
            client_id: ActiveValue::Set(contract.client_id),
            title: ActiveValue::Set(contract.title.trim().to_string()),
            status: ActiveValue::Set(ContractStatus::Draft),
            provider: ActiveValue::Set(None),
            external_id: ActiveValue::Set(None),
            document_url: ActiveValue::Set(text_or_none(contract.document_url)),
            signer_name: ActiveValue::Set(text_or_none(contract.signer_name)),
            signer_email: ActiveValue::Set(
                text_or_none(contract.signer_email).map(|e| e.to_lowercase()),
            ),
            value_cents: ActiveValue::Set(contract.value_cents.unwrap_or(0)),
            sent_at: ActiveValue::Set(None),
            signed_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(&self, contract_id: i32) -> Result<Option<entity::contract::Model>, DbErr> {
        entity::prelude::Contract::find_by_id(contract_id)
            .one(self.db)
            .await
    }

    /// Finds the contract a provider refers to by its envelope, document or agreement id
    pub async fn find_by_external(
        &self,
        provider: EsignProvider,
        external_id: &str,
    ) -> Result<Option<entity::contract::Model>, DbErr> {
        entity::prelude::Contract::find()
            .filter(entity::contract::Column::Provider.eq(provider))
            .filter(entity::contract::Column::ExternalId.eq(external_id))
            .one(self.db)
            .await
    }

    pub async fn list(
        &self,
        filter: &ContractListParams,
    ) -> Result<Vec<entity::contract::Model>, DbErr> {
        let mut query = entity::prelude::Contract::find();

        if let Some(status) = filter.status {
            query = query.filter(entity::contract::Column::Status.eq(status));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(entity::contract::Column::ClientId.eq(client_id));
        }

        query
            .order_by_desc(entity::contract::Column::CreatedAt)
            .order_by_desc(entity::contract::Column::Id)
            .all(self.db)
            .await
    }

    /// Applies a partial update, returning `None` if the contract does not exist
    pub async fn update(
        &self,
        contract_id: i32,
        changes: UpdateContractDto,
    ) -> Result<Option<entity::contract::Model>, DbErr> {
        let Some(contract) = self.get(contract_id).await? else {
            return Ok(None);
        };

        let mut contract = contract.into_active_model();
        if let Some(title) = changes.title {
            contract.title = ActiveValue::Set(title.trim().to_string());
        }
        if let Some(status) = changes.status {
            apply_status(&mut contract, status);
        }
        patch_text(&mut contract.document_url, changes.document_url);
        patch_text(&mut contract.signer_name, changes.signer_name);
        patch_text(
            &mut contract.signer_email,
            changes.signer_email.map(|e| e.to_lowercase()),
        );
        if let Some(value) = changes.value_cents {
            contract.value_cents = ActiveValue::Set(value);
        }
        contract.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(contract.update(self.db).await?))
    }

    /// Records that a contract went out through an e-sign provider
    pub async fn mark_sent(
        &self,
        contract: entity::contract::Model,
        provider: EsignProvider,
        external_id: String,
    ) -> Result<entity::contract::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let mut contract = contract.into_active_model();
        contract.provider = ActiveValue::Set(Some(provider));
        contract.external_id = ActiveValue::Set(Some(external_id));
        contract.status = ActiveValue::Set(ContractStatus::Sent);
        contract.sent_at = ActiveValue::Set(Some(now));
        contract.updated_at = ActiveValue::Set(now);

        contract.update(self.db).await
    }

    pub async fn set_status(
        &self,
        contract: entity::contract::Model,
        status: ContractStatus,
    ) -> Result<entity::contract::Model, DbErr> {
        let mut contract = contract.into_active_model();
        apply_status(&mut contract, status);
        contract.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        contract.update(self.db).await
    }

    pub async fn delete(&self, contract_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Contract::delete_by_id(contract_id)
            .exec(self.db)
            .await
    }
}

/// Sets the status, stamping `signed_at` the first time a contract becomes signed
fn apply_status(contract: &mut entity::contract::ActiveModel, status: ContractStatus) {
    let already_signed = matches!(&contract.signed_at, ActiveValue::Unchanged(Some(_)));

    contract.status = ActiveValue::Set(status);
    if status == ContractStatus::Signed && !already_signed {
        contract.signed_at = ActiveValue::Set(Some(Utc::now().naive_utc()));
    }
}
