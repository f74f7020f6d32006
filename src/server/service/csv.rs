//! CSV import and export per resource.
//!
//! Imports upsert each row against a natural key: email for clients, pilots and leads,
//! invoice number for invoices and client, title and scheduled date for jobs. Records
//! without an email fall back to their name (and company, for leads), and jobs and
//! invoices name their client by email or by name. A row that equals the stored record
//! is skipped. Rows go through the same validation as the JSON
//! API, so an import can never store what a create or update request could not.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use entity::sea_orm_active_enums::{
    ContractStatus, EsignProvider, InvoiceStatus, JobStatus, LeadStatus, PilotStatus,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::{
    model::{
        api::ImportSummaryDto,
        client::{CreateClientDto, UpdateClientDto},
        contract::ContractListParams,
        invoice::{CreateInvoiceDto, InvoiceListParams, UpdateInvoiceDto},
        job::{CreateJobDto, JobListParams, UpdateJobDto},
        lead::{CreateLeadDto, UpdateLeadDto},
        pilot::{CreatePilotDto, UpdatePilotDto},
    },
    server::{
        data::{
            client::ClientRepository,
            contract::ContractRepository,
            invoice::{InvoiceRepository, NewInvoice},
            job::JobRepository,
            lead::LeadRepository,
            pilot::PilotRepository,
        },
        error::Error,
        integration::Integrations,
        model::db::{ClientModel, ContractModel, InvoiceModel, JobModel, LeadModel, PilotModel},
        service::{
            client::ClientService,
            invoice::{check_terms, InvoiceService, DEFAULT_PAYMENT_TERMS_DAYS},
            job::JobService,
            lead::LeadService,
            pilot::PilotService,
        },
        util::{
            csv::{read, write, ImportReport, RowOutcome},
            time::add_days,
            validate,
        },
    },
};

pub const CLIENT_COLUMNS: [&str; 6] = ["name", "contact_name", "email", "phone", "address", "notes"];

pub const PILOT_COLUMNS: [&str; 9] = [
    "name",
    "email",
    "phone",
    "status",
    "faa_cert_number",
    "faa_cert_expiry",
    "insurance_expiry",
    "hourly_rate_cents",
    "home_base",
];

pub const JOB_COLUMNS: [&str; 7] = [
    "title",
    "client_email",
    "client_name",
    "status",
    "scheduled_date",
    "location",
    "price_cents",
];

pub const INVOICE_COLUMNS: [&str; 8] = [
    "invoice_number",
    "client_email",
    "client_name",
    "amount_cents",
    "status",
    "issue_date",
    "due_date",
    "notes",
];

pub const LEAD_COLUMNS: [&str; 8] = [
    "name",
    "company",
    "email",
    "phone",
    "source",
    "status",
    "estimated_value_cents",
    "notes",
];

pub const CONTRACT_COLUMNS: [&str; 10] = [
    "id",
    "client_name",
    "title",
    "status",
    "provider",
    "signer_name",
    "signer_email",
    "value_cents",
    "sent_at",
    "signed_at",
];

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct ClientRow {
    name: String,
    contact_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    notes: Option<String>,
}

impl From<ClientModel> for ClientRow {
    fn from(client: ClientModel) -> Self {
        Self {
            name: client.name,
            contact_name: client.contact_name,
            email: client.email,
            phone: client.phone,
            address: client.address,
            notes: client.notes,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct PilotRow {
    name: String,
    email: String,
    phone: Option<String>,
    status: Option<PilotStatus>,
    faa_cert_number: Option<String>,
    faa_cert_expiry: Option<NaiveDate>,
    insurance_expiry: Option<NaiveDate>,
    hourly_rate_cents: Option<i64>,
    home_base: Option<String>,
}

impl From<PilotModel> for PilotRow {
    fn from(pilot: PilotModel) -> Self {
        Self {
            name: pilot.name,
            email: pilot.email,
            phone: pilot.phone,
            status: Some(pilot.status),
            faa_cert_number: pilot.faa_cert_number,
            faa_cert_expiry: pilot.faa_cert_expiry,
            insurance_expiry: pilot.insurance_expiry,
            hourly_rate_cents: Some(pilot.hourly_rate_cents),
            home_base: pilot.home_base,
        }
    }
}

/// How a job or invoice row names its client
#[derive(Clone, Default)]
struct ClientRef {
    email: Option<String>,
    name: Option<String>,
}

impl From<&ClientModel> for ClientRef {
    fn from(client: &ClientModel) -> Self {
        Self {
            email: client.email.clone(),
            name: Some(client.name.clone()),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct JobRow {
    title: String,
    client_email: Option<String>,
    client_name: Option<String>,
    status: Option<JobStatus>,
    scheduled_date: Option<NaiveDate>,
    location: Option<String>,
    price_cents: Option<i64>,
}

impl JobRow {
    fn new(job: JobModel, client: ClientRef) -> Self {
        Self {
            title: job.title,
            client_email: client.email,
            client_name: client.name,
            status: Some(job.status),
            scheduled_date: job.scheduled_date,
            location: job.location,
            price_cents: Some(job.price_cents),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct InvoiceRow {
    invoice_number: Option<String>,
    client_email: Option<String>,
    client_name: Option<String>,
    amount_cents: i64,
    status: Option<InvoiceStatus>,
    issue_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    notes: Option<String>,
}

impl InvoiceRow {
    fn new(invoice: InvoiceModel, client: ClientRef) -> Self {
        Self {
            invoice_number: Some(invoice.invoice_number),
            client_email: client.email,
            client_name: client.name,
            amount_cents: invoice.amount_cents,
            status: Some(invoice.status),
            issue_date: Some(invoice.issue_date),
            due_date: Some(invoice.due_date),
            notes: invoice.notes,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct LeadRow {
    name: String,
    company: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    source: Option<String>,
    status: Option<LeadStatus>,
    estimated_value_cents: Option<i64>,
    notes: Option<String>,
}

impl From<LeadModel> for LeadRow {
    fn from(lead: LeadModel) -> Self {
        Self {
            name: lead.name,
            company: lead.company,
            email: lead.email,
            phone: lead.phone,
            source: lead.source,
            status: Some(lead.status),
            estimated_value_cents: Some(lead.estimated_value_cents),
            notes: lead.notes,
        }
    }
}

#[derive(Serialize)]
struct ContractRow {
    id: i32,
    client_name: Option<String>,
    title: String,
    status: ContractStatus,
    provider: Option<EsignProvider>,
    signer_name: Option<String>,
    signer_email: Option<String>,
    value_cents: i64,
    sent_at: Option<chrono::NaiveDateTime>,
    signed_at: Option<chrono::NaiveDateTime>,
}

impl ContractRow {
    fn new(contract: ContractModel, client_name: Option<String>) -> Self {
        Self {
            id: contract.id,
            client_name,
            title: contract.title,
            status: contract.status,
            provider: contract.provider,
            signer_name: contract.signer_name,
            signer_email: contract.signer_email,
            value_cents: contract.value_cents,
            sent_at: contract.sent_at,
            signed_at: contract.signed_at,
        }
    }
}

/// Blank optional text sent as an empty string, which clears the column on update
fn clearing(value: Option<String>) -> Option<String> {
    Some(value.unwrap_or_default())
}

/// The client columns as the row gave them, so a matched client never differs on them
fn row_client(email: &Option<String>, name: &Option<String>) -> ClientRef {
    ClientRef {
        email: email.clone(),
        name: name.clone(),
    }
}

pub struct CsvService<'a> {
    db: &'a DatabaseConnection,
    integrations: &'a Integrations,
}

impl<'a> CsvService<'a> {
    /// Creates a new instance of [`CsvService`]
    pub fn new(db: &'a DatabaseConnection, integrations: &'a Integrations) -> Self {
        Self { db, integrations }
    }

    pub async fn export_clients(&self) -> Result<String, Error> {
        let clients = ClientRepository::new(self.db).list(None).await?;

        write(&CLIENT_COLUMNS, clients.into_iter().map(ClientRow::from))
    }

    pub async fn import_clients(&self, data: &[u8]) -> Result<ImportSummaryDto, Error> {
        let mut report = ImportReport::default();

        for row in read::<ClientRow>(data, &["name"])? {
            let outcome = match row.record {
                Ok(record) => self.import_client(record).await,
                Err(e) => Err(e.into()),
            };
            report.record(row.line, outcome);
        }

        Ok(report.finish())
    }

    /// Upserts a client by email, or by name for clients without one
    async fn import_client(&self, row: ClientRow) -> Result<RowOutcome, Error> {
        let client_repo = ClientRepository::new(self.db);
        let service = ClientService::new(self.db);

        let existing = match row.email.as_deref() {
            Some(email) => client_repo.find_by_email(&validate::email(email)?).await?,
            None => client_repo.find_by_name_without_email(&row.name).await?,
        };

        let Some(existing) = existing else {
            service
                .create(CreateClientDto {
                    name: row.name,
                    contact_name: row.contact_name,
                    email: row.email,
                    phone: row.phone,
                    address: row.address,
                    notes: row.notes,
                })
                .await?;

            return Ok(RowOutcome::Created);
        };

        if ClientRow::from(existing.clone()) == row {
            return Ok(RowOutcome::Skipped);
        }

        service
            .update(
                existing.id,
                UpdateClientDto {
                    name: Some(row.name),
                    contact_name: clearing(row.contact_name),
                    email: clearing(row.email),
                    phone: clearing(row.phone),
                    address: clearing(row.address),
                    notes: clearing(row.notes),
                },
            )
            .await?;

        Ok(RowOutcome::Updated)
    }

    pub async fn export_pilots(&self) -> Result<String, Error> {
        let pilots = PilotRepository::new(self.db).list(None).await?;

        write(&PILOT_COLUMNS, pilots.into_iter().map(PilotRow::from))
    }

    pub async fn import_pilots(&self, data: &[u8]) -> Result<ImportSummaryDto, Error> {
        let mut report = ImportReport::default();

        for row in read::<PilotRow>(data, &["name", "email"])? {
            let outcome = match row.record {
                Ok(record) => self.import_pilot(record).await,
                Err(e) => Err(e.into()),
            };
            report.record(row.line, outcome);
        }

        Ok(report.finish())
    }

    async fn import_pilot(&self, row: PilotRow) -> Result<RowOutcome, Error> {
        let email = validate::email(&row.email)?;
        let service = PilotService::new(self.db);

        let Some(existing) = PilotRepository::new(self.db).find_by_email(&email).await? else {
            service
                .create(CreatePilotDto {
                    name: row.name,
                    email,
                    phone: row.phone,
                    status: row.status,
                    faa_cert_number: row.faa_cert_number,
                    faa_cert_expiry: row.faa_cert_expiry,
                    insurance_expiry: row.insurance_expiry,
                    hourly_rate_cents: row.hourly_rate_cents,
                    home_base: row.home_base,
                })
                .await?;

            return Ok(RowOutcome::Created);
        };

        if PilotRow::from(existing.clone()) == row {
            return Ok(RowOutcome::Skipped);
        }

        service
            .update(
                existing.id,
                UpdatePilotDto {
                    name: Some(row.name),
                    email: None,
                    phone: clearing(row.phone),
                    status: row.status,
                    faa_cert_number: clearing(row.faa_cert_number),
                    faa_cert_expiry: row.faa_cert_expiry,
                    insurance_expiry: row.insurance_expiry,
                    hourly_rate_cents: row.hourly_rate_cents,
                    home_base: clearing(row.home_base),
                },
            )
            .await?;

        Ok(RowOutcome::Updated)
    }

    pub async fn export_jobs(&self) -> Result<String, Error> {
        let clients = self.client_refs().await?;
        let jobs = JobRepository::new(self.db)
            .list(&JobListParams::default())
            .await?;

        write(
            &JOB_COLUMNS,
            jobs.into_iter().map(|job| {
                let client = clients.get(&job.client_id).cloned().unwrap_or_default();
                JobRow::new(job, client)
            }),
        )
    }

    pub async fn import_jobs(&self, data: &[u8]) -> Result<ImportSummaryDto, Error> {
        let mut report = ImportReport::default();

        for row in read::<JobRow>(data, &["title"])? {
            let outcome = match row.record {
                Ok(record) => self.import_job(record).await,
                Err(e) => Err(e.into()),
            };
            report.record(row.line, outcome);
        }

        Ok(report.finish())
    }

    async fn import_job(&self, row: JobRow) -> Result<RowOutcome, Error> {
        let title = validate::required_text("title", &row.title)?;
        let client = self.find_client(&row.client_email, &row.client_name).await?;
        let service = JobService::new(self.db, self.integrations);

        let existing = JobRepository::new(self.db)
            .find_match(client.id, &title, row.scheduled_date)
            .await?;

        let Some(existing) = existing else {
            service
                .create(CreateJobDto {
                    client_id: client.id,
                    title,
                    description: None,
                    location: row.location,
                    scheduled_date: row.scheduled_date,
                    status: row.status,
                    price_cents: row.price_cents,
                })
                .await?;

            return Ok(RowOutcome::Created);
        };

        let stored = JobRow::new(
            existing.clone(),
            row_client(&row.client_email, &row.client_name),
        );
        if stored == row {
            return Ok(RowOutcome::Skipped);
        }

        service
            .update(
                existing.id,
                UpdateJobDto {
                    status: row.status,
                    location: clearing(row.location),
                    price_cents: row.price_cents,
                    ..Default::default()
                },
            )
            .await?;

        Ok(RowOutcome::Updated)
    }

    pub async fn export_invoices(&self) -> Result<String, Error> {
        let clients = self.client_refs().await?;
        let invoices = InvoiceRepository::new(self.db)
            .list(&InvoiceListParams::default())
            .await?;

        write(
            &INVOICE_COLUMNS,
            invoices.into_iter().map(|invoice| {
                let client = clients.get(&invoice.client_id).cloned().unwrap_or_default();
                InvoiceRow::new(invoice, client)
            }),
        )
    }

    pub async fn import_invoices(&self, data: &[u8]) -> Result<ImportSummaryDto, Error> {
        let mut report = ImportReport::default();

        for row in read::<InvoiceRow>(data, &["amount_cents"])? {
            let outcome = match row.record {
                Ok(record) => self.import_invoice(record).await,
                Err(e) => Err(e.into()),
            };
            report.record(row.line, outcome);
        }

        Ok(report.finish())
    }

    /// Upserts an invoice by number. A row without a number is issued the next free one.
    async fn import_invoice(&self, row: InvoiceRow) -> Result<RowOutcome, Error> {
        let client = self.find_client(&row.client_email, &row.client_name).await?;
        let invoice_repo = InvoiceRepository::new(self.db);
        let service = InvoiceService::new(self.db, self.integrations);

        let Some(invoice_number) = row.invoice_number.clone() else {
            service
                .create(CreateInvoiceDto {
                    client_id: client.id,
                    job_id: None,
                    amount_cents: row.amount_cents,
                    status: row.status,
                    issue_date: row.issue_date,
                    due_date: row.due_date,
                    notes: row.notes,
                })
                .await?;

            return Ok(RowOutcome::Created);
        };

        let Some(existing) = invoice_repo.find_by_number(&invoice_number).await? else {
            let issue_date = row.issue_date.unwrap_or_else(|| Utc::now().date_naive());
            let due_date = match row.due_date {
                Some(due_date) => due_date,
                None => add_days(issue_date, DEFAULT_PAYMENT_TERMS_DAYS)?,
            };
            check_terms(row.amount_cents, issue_date, due_date)?;

            let created = invoice_repo
                .create(NewInvoice {
                    invoice_number,
                    client_id: client.id,
                    job_id: None,
                    amount_cents: row.amount_cents,
                    status: row.status.unwrap_or(InvoiceStatus::Draft),
                    issue_date,
                    due_date,
                    notes: row.notes,
                })
                .await?;

            tracing::info!(
                invoice_id = %created.id,
                "Imported invoice {}",
                created.invoice_number
            );

            return Ok(RowOutcome::Created);
        };

        if existing.client_id != client.id {
            return Err(Error::validation(format!(
                "Invoice {} belongs to another client",
                existing.invoice_number
            )));
        }
        let stored = InvoiceRow::new(
            existing.clone(),
            row_client(&row.client_email, &row.client_name),
        );
        if stored == row {
            return Ok(RowOutcome::Skipped);
        }

        service
            .update(
                existing.id,
                UpdateInvoiceDto {
                    job_id: None,
                    amount_cents: Some(row.amount_cents),
                    status: row.status,
                    issue_date: row.issue_date,
                    due_date: row.due_date,
                    notes: clearing(row.notes),
                },
            )
            .await?;

        Ok(RowOutcome::Updated)
    }

    pub async fn export_leads(&self) -> Result<String, Error> {
        let leads = LeadRepository::new(self.db).list(None).await?;

        write(&LEAD_COLUMNS, leads.into_iter().map(LeadRow::from))
    }

    pub async fn import_leads(&self, data: &[u8]) -> Result<ImportSummaryDto, Error> {
        let mut report = ImportReport::default();

        for row in read::<LeadRow>(data, &["name"])? {
            let outcome = match row.record {
                Ok(record) => self.import_lead(record).await,
                Err(e) => Err(e.into()),
            };
            report.record(row.line, outcome);
        }

        Ok(report.finish())
    }

    /// Upserts a lead by email, or by name and company for leads without one
    async fn import_lead(&self, row: LeadRow) -> Result<RowOutcome, Error> {
        let lead_repo = LeadRepository::new(self.db);
        let service = LeadService::new(self.db);

        let existing = match row.email.as_deref() {
            Some(email) => lead_repo.find_by_email(&validate::email(email)?).await?,
            None => {
                lead_repo
                    .find_by_name_without_email(&row.name, row.company.as_deref())
                    .await?
            }
        };

        let Some(existing) = existing else {
            service
                .create(CreateLeadDto {
                    name: row.name,
                    company: row.company,
                    email: row.email,
                    phone: row.phone,
                    source: row.source,
                    status: row.status,
                    estimated_value_cents: row.estimated_value_cents,
                    notes: row.notes,
                })
                .await?;

            return Ok(RowOutcome::Created);
        };

        if LeadRow::from(existing.clone()) == row {
            return Ok(RowOutcome::Skipped);
        }

        service
            .update(
                existing.id,
                UpdateLeadDto {
                    name: Some(row.name),
                    company: clearing(row.company),
                    email: None,
                    phone: clearing(row.phone),
                    source: clearing(row.source),
                    status: row.status,
                    estimated_value_cents: row.estimated_value_cents,
                    notes: clearing(row.notes),
                },
            )
            .await?;

        Ok(RowOutcome::Updated)
    }

    pub async fn export_contracts(&self) -> Result<String, Error> {
        let names: HashMap<i32, String> = ClientRepository::new(self.db)
            .list(None)
            .await?
            .into_iter()
            .map(|client| (client.id, client.name))
            .collect();
        let contracts = ContractRepository::new(self.db)
            .list(&ContractListParams::default())
            .await?;

        write(
            &CONTRACT_COLUMNS,
            contracts.into_iter().map(|contract| {
                let name = names.get(&contract.client_id).cloned();
                ContractRow::new(contract, name)
            }),
        )
    }

    async fn client_refs(&self) -> Result<HashMap<i32, ClientRef>, Error> {
        Ok(ClientRepository::new(self.db)
            .list(None)
            .await?
            .iter()
            .map(|client| (client.id, ClientRef::from(client)))
            .collect())
    }

    /// Resolves a row's client by email, or by name among clients without an email
    async fn find_client(
        &self,
        email: &Option<String>,
        name: &Option<String>,
    ) -> Result<ClientModel, Error> {
        let client_repo = ClientRepository::new(self.db);

        match (email.as_deref(), name.as_deref()) {
            (Some(email), _) => {
                let email = validate::email(email)?;
                client_repo
                    .find_by_email(&email)
                    .await?
                    .ok_or_else(|| Error::validation(format!("No client with email {}", email)))
            }
            (None, Some(name)) => client_repo
                .find_by_name_without_email(name)
                .await?
                .ok_or_else(|| {
                    Error::validation(format!("No client without an email named {}", name))
                }),
            (None, None) => Err(Error::validation(
                "client_email or client_name is required",
            )),
        }
    }
}
