use chrono::{Datelike, NaiveDate, Utc};
use entity::sea_orm_active_enums::InvoiceStatus;
use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use crate::{
    model::invoice::{
        CheckoutDto, CreateInvoiceDto, InvoiceDto, InvoiceListParams, UpdateInvoiceDto,
    },
    server::{
        data::{
            client::ClientRepository,
            invoice::{InvoiceRepository, NewInvoice},
            job::JobRepository,
        },
        error::{auth::AuthError, Error},
        integration::{notify::Email, stripe::CheckoutRequest, Integrations},
        model::{access::CurrentUser, db::InvoiceModel},
        util::{time::add_days, validate},
    },
};

/// Days between issue and due date when no due date is given
pub const DEFAULT_PAYMENT_TERMS_DAYS: i64 = 30;

/// Attempts at allocating a number when a concurrent insert takes the same one
const NUMBER_ATTEMPTS: usize = 3;

pub struct InvoiceService<'a> {
    db: &'a DatabaseConnection,
    integrations: &'a Integrations,
}

/// Number prefix for invoices issued in `year`
pub fn number_prefix(year: i32) -> String {
    format!("INV-{}-", year)
}

/// Checks the amount is positive and the due date is not before the issue date
pub fn check_terms(amount_cents: i64, issue_date: NaiveDate, due_date: NaiveDate) -> Result<(), Error> {
    validate::positive_cents("amount_cents", amount_cents)?;
    if due_date < issue_date {
        return Err(Error::validation("due_date must not be before issue_date"));
    }

    Ok(())
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl<'a> InvoiceService<'a> {
    /// Creates a new instance of [`InvoiceService`]
    pub fn new(db: &'a DatabaseConnection, integrations: &'a Integrations) -> Self {
        Self { db, integrations }
    }

    /// Next free number for `year`, one past the highest issued so far
    pub async fn next_number(&self, year: i32) -> Result<String, Error> {
        let prefix = number_prefix(year);
        let last = InvoiceRepository::new(self.db).max_sequence(&prefix).await?;

        Ok(format!("{}{:04}", prefix, last + 1))
    }

    /// Creates an invoice numbered `INV-{year}-{sequence}` for the year of its issue date.
    ///
    /// # Returns
    /// - `Ok(InvoiceDto)` - Invoice created
    /// - `Err(Error::RequestError)` - Non-positive amount, due date before issue date, missing
    ///   client, or a job belonging to another client (400)
    /// - `Err(Error::DbErr)` - Database operation failed
    pub async fn create(&self, invoice: CreateInvoiceDto) -> Result<InvoiceDto, Error> {
        let issue_date = invoice.issue_date.unwrap_or_else(|| Utc::now().date_naive());
        let due_date = match invoice.due_date {
            Some(due_date) => due_date,
            None => add_days(issue_date, DEFAULT_PAYMENT_TERMS_DAYS)?,
        };
        check_terms(invoice.amount_cents, issue_date, due_date)?;
        self.check_client_and_job(invoice.client_id, invoice.job_id)
            .await?;

        let invoice_repo = InvoiceRepository::new(self.db);
        let mut attempt = 0;
        let created = loop {
            attempt += 1;
            let invoice_number = self.next_number(issue_date.year()).await?;

            let result = invoice_repo
                .create(NewInvoice {
                    invoice_number,
                    client_id: invoice.client_id,
                    job_id: invoice.job_id,
                    amount_cents: invoice.amount_cents,
                    status: invoice.status.unwrap_or(InvoiceStatus::Draft),
                    issue_date,
                    due_date,
                    notes: invoice.notes.clone(),
                })
                .await;

            match result {
                Ok(created) => break created,
                Err(e) if is_unique_violation(&e) && attempt < NUMBER_ATTEMPTS => {
                    tracing::debug!("Invoice number taken concurrently, retrying: {}", e);
                }
                Err(e) => return Err(e.into()),
            }
        };

        tracing::info!(
            invoice_id = %created.id,
            "Created invoice {}",
            created.invoice_number
        );

        Ok(created.into())
    }

    pub async fn get(&self, user: &CurrentUser, invoice_id: i32) -> Result<InvoiceDto, Error> {
        Ok(self.visible_invoice(user, invoice_id).await?.into())
    }

    /// Invoices matching `params`; client accounts only ever see their own
    pub async fn list(
        &self,
        user: &CurrentUser,
        mut params: InvoiceListParams,
    ) -> Result<Vec<InvoiceDto>, Error> {
        if !user.is_back_office() {
            let client_id = user.own_client_id().ok_or(AuthError::Forbidden)?;
            params.client_id = Some(client_id);
        }

        let invoices = InvoiceRepository::new(self.db).list(&params).await?;

        Ok(invoices.into_iter().map(InvoiceDto::from).collect())
    }

    pub async fn update(
        &self,
        invoice_id: i32,
        changes: UpdateInvoiceDto,
    ) -> Result<InvoiceDto, Error> {
        let current = self.find(invoice_id).await?;
        check_terms(
            changes.amount_cents.unwrap_or(current.amount_cents),
            changes.issue_date.unwrap_or(current.issue_date),
            changes.due_date.unwrap_or(current.due_date),
        )?;
        if changes.job_id.is_some() {
            self.check_client_and_job(current.client_id, changes.job_id)
                .await?;
        }

        InvoiceRepository::new(self.db)
            .update(invoice_id, changes)
            .await?
            .map(InvoiceDto::from)
            .ok_or_else(|| Error::not_found("Invoice", invoice_id))
    }

    pub async fn delete(&self, invoice_id: i32) -> Result<(), Error> {
        let result = InvoiceRepository::new(self.db).delete(invoice_id).await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("Invoice", invoice_id));
        }

        Ok(())
    }

    /// Starts a Stripe Checkout session for an unpaid invoice.
    ///
    /// # Returns
    /// - `Ok(CheckoutDto)` - Session created, redirect the payer to its URL
    /// - `Err(Error::RequestError)` - Invoice missing (404), already paid or void (400)
    /// - `Err(Error::IntegrationError)` - Stripe not configured (503) or failed (502)
    pub async fn checkout(
        &self,
        user: &CurrentUser,
        invoice_id: i32,
        app_url: &str,
    ) -> Result<CheckoutDto, Error> {
        let invoice = self.visible_invoice(user, invoice_id).await?;
        if matches!(invoice.status, InvoiceStatus::Paid | InvoiceStatus::Void) {
            return Err(Error::validation(format!(
                "Invoice {} is {:?} and cannot be paid",
                invoice.invoice_number, invoice.status
            )));
        }

        let stripe = self.integrations.stripe()?;
        let client = ClientRepository::new(self.db).get(invoice.client_id).await?;

        let checkout = stripe
            .create_checkout_session(CheckoutRequest {
                invoice_id: invoice.id,
                invoice_number: &invoice.invoice_number,
                amount_cents: invoice.amount_cents,
                customer_email: client.as_ref().and_then(|c| c.email.as_deref()),
                success_url: format!("{}/invoices/{}?checkout=success", app_url, invoice.id),
                cancel_url: format!("{}/invoices/{}?checkout=cancelled", app_url, invoice.id),
            })
            .await?;

        InvoiceRepository::new(self.db)
            .set_checkout_session(invoice, checkout.session_id.clone())
            .await?;

        Ok(checkout)
    }

    /// Marks sent invoices past their due date overdue and emails each client a reminder.
    ///
    /// Returns the number of invoices marked overdue.
    pub async fn mark_overdue(&self, today: NaiveDate) -> Result<usize, Error> {
        let invoice_repo = InvoiceRepository::new(self.db);
        let client_repo = ClientRepository::new(self.db);
        let notifier = self.integrations.notifier();

        let past_due = invoice_repo.list_past_due(today).await?;
        let count = past_due.len();

        for invoice in past_due {
            let invoice = invoice_repo
                .set_status(invoice, InvoiceStatus::Overdue)
                .await?;

            let email = client_repo
                .get(invoice.client_id)
                .await?
                .and_then(|c| c.email);
            match email {
                Some(to) => notifier.spawn_email(Email {
                    to,
                    subject: format!("Invoice {} is overdue", invoice.invoice_number),
                    body: format!(
                        "Invoice {} for ${}.{:02} was due on {} and is now overdue.\n",
                        invoice.invoice_number,
                        invoice.amount_cents / 100,
                        invoice.amount_cents % 100,
                        invoice.due_date,
                    ),
                }),
                None => tracing::debug!(
                    invoice_id = %invoice.id,
                    "No reminder sent, client has no email"
                ),
            }
        }

        Ok(count)
    }

    async fn visible_invoice(
        &self,
        user: &CurrentUser,
        invoice_id: i32,
    ) -> Result<InvoiceModel, Error> {
        let invoice = self.find(invoice_id).await?;
        user.require_client_or_back_office(invoice.client_id)?;

        Ok(invoice)
    }

    async fn find(&self, invoice_id: i32) -> Result<InvoiceModel, Error> {
        InvoiceRepository::new(self.db)
            .get(invoice_id)
            .await?
            .ok_or_else(|| Error::not_found("Invoice", invoice_id))
    }

    async fn check_client_and_job(&self, client_id: i32, job_id: Option<i32>) -> Result<(), Error> {
        if ClientRepository::new(self.db).get(client_id).await?.is_none() {
            return Err(Error::validation(format!(
                "Client {} does not exist",
                client_id
            )));
        }

        if let Some(job_id) = job_id {
            match JobRepository::new(self.db).get(job_id).await? {
                Some(job) if job.client_id == client_id => {}
                Some(_) => {
                    return Err(Error::validation(format!(
                        "Job {} belongs to another client",
                        job_id
                    )))
                }
                None => return Err(Error::validation(format!("Job {} does not exist", job_id))),
            }
        }

        Ok(())
    }
}
