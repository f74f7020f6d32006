use entity::sea_orm_active_enums::EsignProvider;
use sea_orm::DatabaseConnection;

use crate::{
    model::contract::{ContractDto, ContractListParams, CreateContractDto, UpdateContractDto},
    server::{
        data::{client::ClientRepository, contract::ContractRepository},
        error::{auth::AuthError, Error},
        integration::{
            esign::{provider_name, SignatureRequest},
            Integrations,
        },
        model::{access::CurrentUser, db::ContractModel},
        util::validate,
    },
};

pub struct ContractService<'a> {
    db: &'a DatabaseConnection,
    integrations: &'a Integrations,
}

impl<'a> ContractService<'a> {
    /// Creates a new instance of [`ContractService`]
    pub fn new(db: &'a DatabaseConnection, integrations: &'a Integrations) -> Self {
        Self { db, integrations }
    }

    /// Creates a draft contract for an existing client
    pub async fn create(&self, mut contract: CreateContractDto) -> Result<ContractDto, Error> {
        contract.title = validate::required_text("title", &contract.title)?;
        contract.signer_email = validate::optional_email(contract.signer_email.as_deref())?;
        if let Some(value) = contract.value_cents {
            validate::non_negative_cents("value_cents", value)?;
        }
        if ClientRepository::new(self.db)
            .get(contract.client_id)
            .await?
            .is_none()
        {
            return Err(Error::validation(format!(
                "Client {} does not exist",
                contract.client_id
            )));
        }

        let created = ContractRepository::new(self.db).create(contract).await?;

        Ok(created.into())
    }

    pub async fn get(&self, user: &CurrentUser, contract_id: i32) -> Result<ContractDto, Error> {
        let contract = self.find(contract_id).await?;
        user.require_client_or_back_office(contract.client_id)?;

        Ok(contract.into())
    }

    /// Contracts matching `params`, newest first; client accounts only see their own
    pub async fn list(
        &self,
        user: &CurrentUser,
        mut params: ContractListParams,
    ) -> Result<Vec<ContractDto>, Error> {
        if !user.is_back_office() {
            let client_id = user.own_client_id().ok_or(AuthError::Forbidden)?;
            params.client_id = Some(client_id);
        }

        let contracts = ContractRepository::new(self.db).list(&params).await?;

        Ok(contracts.into_iter().map(ContractDto::from).collect())
    }

    /// Applies a partial update. Any status may be set, moving to signed stamps `signed_at`.
    pub async fn update(
        &self,
        contract_id: i32,
        mut changes: UpdateContractDto,
    ) -> Result<ContractDto, Error> {
        if let Some(title) = &changes.title {
            changes.title = Some(validate::required_text("title", title)?);
        }
        if let Some(email) = changes.signer_email.as_deref() {
            if !email.trim().is_empty() {
                changes.signer_email = Some(validate::email(email)?);
            }
        }
        if let Some(value) = changes.value_cents {
            validate::non_negative_cents("value_cents", value)?;
        }

        ContractRepository::new(self.db)
            .update(contract_id, changes)
            .await?
            .map(ContractDto::from)
            .ok_or_else(|| Error::not_found("Contract", contract_id))
    }

    pub async fn delete(&self, contract_id: i32) -> Result<(), Error> {
        let result = ContractRepository::new(self.db).delete(contract_id).await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("Contract", contract_id));
        }

        Ok(())
    }

    /// Sends a contract out for signature through `provider`.
    ///
    /// # Returns
    /// - `Ok(ContractDto)` - Sent, with the provider's document id recorded and status `sent`
    /// - `Err(Error::RequestError)` - Contract missing (404), or without a document URL or
    ///   signer email (400)
    /// - `Err(Error::IntegrationError)` - Provider not configured (503) or failed (502)
    pub async fn send(
        &self,
        contract_id: i32,
        provider: EsignProvider,
    ) -> Result<ContractDto, Error> {
        let contract = self.find(contract_id).await?;
        let request = SignatureRequest::from_contract(&contract)?;

        let external_id = self.integrations.esign(provider)?.send(&request).await?;

        tracing::info!(
            contract_id = %contract.id,
            external_id = %external_id,
            "Sent contract through {}",
            provider_name(provider)
        );

        let sent = ContractRepository::new(self.db)
            .mark_sent(contract, provider, external_id)
            .await?;

        Ok(sent.into())
    }

    async fn find(&self, contract_id: i32) -> Result<ContractModel, Error> {
        ContractRepository::new(self.db)
            .get(contract_id)
            .await?
            .ok_or_else(|| Error::not_found("Contract", contract_id))
    }
}
