use sea_orm::DatabaseConnection;

use crate::{
    model::client::{
        ClientDetailDto, ClientDto, ClientListParams, CreateClientDto, UpdateClientDto,
    },
    server::{data::client::ClientRepository, error::Error, util::validate},
};

pub struct ClientService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ClientService<'a> {
    /// Creates a new instance of [`ClientService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, mut client: CreateClientDto) -> Result<ClientDto, Error> {
        client.name = validate::required_text("name", &client.name)?;
        client.email = validate::optional_email(client.email.as_deref())?;
        if let Some(email) = &client.email {
            self.ensure_email_free(email, None).await?;
        }

        let created = ClientRepository::new(self.db).create(client).await?;

        Ok(created.into())
    }

    /// Client with job count and outstanding balance
    pub async fn get(&self, client_id: i32) -> Result<ClientDetailDto, Error> {
        let client_repo = ClientRepository::new(self.db);

        let client = client_repo
            .get(client_id)
            .await?
            .ok_or_else(|| Error::not_found("Client", client_id))?;

        let job_count = client_repo.job_count(client_id).await?;
        let outstanding_cents = client_repo.outstanding_cents(client_id).await?;

        Ok(ClientDetailDto {
            client: client.into(),
            job_count,
            outstanding_cents,
        })
    }

    pub async fn list(&self, params: &ClientListParams) -> Result<Vec<ClientDto>, Error> {
        let clients = ClientRepository::new(self.db)
            .list(params.search.as_deref())
            .await?;

        Ok(clients.into_iter().map(ClientDto::from).collect())
    }

    pub async fn update(
        &self,
        client_id: i32,
        mut changes: UpdateClientDto,
    ) -> Result<ClientDto, Error> {
        if let Some(name) = &changes.name {
            changes.name = Some(validate::required_text("name", name)?);
        }
        if let Some(email) = changes.email.as_deref() {
            // An empty string clears the email
            if !email.trim().is_empty() {
                let email = validate::email(email)?;
                self.ensure_email_free(&email, Some(client_id)).await?;
                changes.email = Some(email);
            }
        }

        ClientRepository::new(self.db)
            .update(client_id, changes)
            .await?
            .map(ClientDto::from)
            .ok_or_else(|| Error::not_found("Client", client_id))
    }

    /// Deletes a client along with its jobs, invoices and contracts
    pub async fn delete(&self, client_id: i32) -> Result<(), Error> {
        let result = ClientRepository::new(self.db).delete(client_id).await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("Client", client_id));
        }

        tracing::info!(client_id = %client_id, "Deleted client");

        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, client_id: Option<i32>) -> Result<(), Error> {
        match ClientRepository::new(self.db).find_by_email(email).await? {
            Some(existing) if Some(existing.id) != client_id => Err(Error::conflict(format!(
                "A client with email {} already exists",
                email
            ))),
            _ => Ok(()),
        }
    }
}
