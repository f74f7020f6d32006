use entity::sea_orm_active_enums::LeadStatus;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        client::{ClientDto, CreateClientDto},
        lead::{CreateLeadDto, LeadConversionDto, LeadDto, UpdateLeadDto},
    },
    server::{
        data::{client::ClientRepository, lead::LeadRepository},
        error::Error,
        util::validate,
    },
};

pub struct LeadService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LeadService<'a> {
    /// Creates a new instance of [`LeadService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, mut lead: CreateLeadDto) -> Result<LeadDto, Error> {
        lead.name = validate::required_text("name", &lead.name)?;
        lead.email = validate::optional_email(lead.email.as_deref())?;
        if let Some(value) = lead.estimated_value_cents {
            validate::non_negative_cents("estimated_value_cents", value)?;
        }

        let created = LeadRepository::new(self.db).create(lead).await?;

        Ok(created.into())
    }

    pub async fn get(&self, lead_id: i32) -> Result<LeadDto, Error> {
        LeadRepository::new(self.db)
            .get(lead_id)
            .await?
            .map(LeadDto::from)
            .ok_or_else(|| Error::not_found("Lead", lead_id))
    }

    pub async fn list(&self, status: Option<LeadStatus>) -> Result<Vec<LeadDto>, Error> {
        let leads = LeadRepository::new(self.db).list(status).await?;

        Ok(leads.into_iter().map(LeadDto::from).collect())
    }

    pub async fn update(&self, lead_id: i32, mut changes: UpdateLeadDto) -> Result<LeadDto, Error> {
        if let Some(name) = &changes.name {
            changes.name = Some(validate::required_text("name", name)?);
        }
        if let Some(email) = changes.email.as_deref() {
            if !email.trim().is_empty() {
                changes.email = Some(validate::email(email)?);
            }
        }
        if let Some(value) = changes.estimated_value_cents {
            validate::non_negative_cents("estimated_value_cents", value)?;
        }

        LeadRepository::new(self.db)
            .update(lead_id, changes)
            .await?
            .map(LeadDto::from)
            .ok_or_else(|| Error::not_found("Lead", lead_id))
    }

    pub async fn delete(&self, lead_id: i32) -> Result<(), Error> {
        let result = LeadRepository::new(self.db).delete(lead_id).await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("Lead", lead_id));
        }

        Ok(())
    }

    /// Turns a lead into a client and marks it won.
    ///
    /// A client already registered under the lead's email is reused. Otherwise a client is
    /// created named after the lead's company (or the lead itself when there is none), with
    /// the lead as its contact.
    ///
    /// # Returns
    /// - `Ok(LeadConversionDto)` - The won lead and its client
    /// - `Err(Error::RequestError)` - Lead missing (404) or already converted (409)
    /// - `Err(Error::DbErr)` - Database operation failed
    pub async fn convert(&self, lead_id: i32) -> Result<LeadConversionDto, Error> {
        let txn = self.db.begin().await?;

        let lead_repo = LeadRepository::new(&txn);
        let client_repo = ClientRepository::new(&txn);

        let lead = lead_repo
            .get(lead_id)
            .await?
            .ok_or_else(|| Error::not_found("Lead", lead_id))?;
        if let Some(client_id) = lead.converted_client_id {
            return Err(Error::conflict(format!(
                "Lead {} was already converted to client {}",
                lead_id, client_id
            )));
        }

        let existing = match lead.email.as_deref() {
            Some(email) => client_repo.find_by_email(email).await?,
            None => None,
        };
        let client = match existing {
            Some(client) => client,
            None => {
                client_repo
                    .create(CreateClientDto {
                        name: lead.company.clone().unwrap_or_else(|| lead.name.clone()),
                        contact_name: Some(lead.name.clone()),
                        email: lead.email.clone(),
                        phone: lead.phone.clone(),
                        address: None,
                        notes: lead.notes.clone(),
                    })
                    .await?
            }
        };

        let lead = lead_repo.mark_converted(lead, client.id).await?;

        txn.commit().await?;

        tracing::info!(
            lead_id = %lead.id,
            client_id = %client.id,
            "Converted lead to client"
        );

        Ok(LeadConversionDto {
            lead: lead.into(),
            client: ClientDto::from(client),
        })
    }
}
