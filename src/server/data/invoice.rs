use chrono::{NaiveDate, NaiveDateTime, Utc};
use entity::sea_orm_active_enums::InvoiceStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    model::invoice::{InvoiceListParams, UpdateInvoiceDto},
    server::data::patch_text,
};

pub struct InvoiceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

/// Fields of a new invoice with its number already allocated
pub struct NewInvoice {
    pub invoice_number: String,
    pub client_id: i32,
    pub job_id: Option<i32>,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

impl<'a, C: ConnectionTrait> InvoiceRepository<'a, C> {
    /// Creates a new instance of [`InvoiceRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, invoice: NewInvoice) -> Result<entity::invoice::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let paid_at = match invoice.status {
            InvoiceStatus::Paid => Some(now),
            _ => None,
        };

        entity::invoice::ActiveModel {
            invoice_number: ActiveValue::Set(invoice.invoice_number),
            client_id: ActiveValue::Set(invoice.client_id),
            job_id: ActiveValue::Set(invoice.job_id),
            amount_cents: ActiveValue::Set(invoice.amount_cents),
            status: ActiveValue::Set(invoice.status),
            issue_date: ActiveValue::Set(invoice.issue_date),
            due_date: ActiveValue::Set(invoice.due_date),
            paid_at: ActiveValue::Set(paid_at),
            stripe_session_id: ActiveValue::Set(None),
            stripe_payment_intent: ActiveValue::Set(None),
            notes: ActiveValue::Set(invoice.notes),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(&self, invoice_id: i32) -> Result<Option<entity::invoice::Model>, DbErr> {
        entity::prelude::Invoice::find_by_id(invoice_id)
            .one(self.db)
            .await
    }

    pub async fn find_by_number(
        &self,
        invoice_number: &str,
    ) -> Result<Option<entity::invoice::Model>, DbErr> {
        entity::prelude::Invoice::find()
            .filter(entity::invoice::Column::InvoiceNumber.eq(invoice_number))
            .one(self.db)
            .await
    }

    /// Lists invoices, newest issue date first
    pub async fn list(
        &self,
        filter: &InvoiceListParams,
    ) -> Result<Vec<entity::invoice::Model>, DbErr> {
        let mut query = entity::prelude::Invoice::find();

        if let Some(status) = filter.status {
            query = query.filter(entity::invoice::Column::Status.eq(status));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(entity::invoice::Column::ClientId.eq(client_id));
        }

        query
            .order_by_desc(entity::invoice::Column::IssueDate)
            .order_by_desc(entity::invoice::Column::Id)
            .all(self.db)
            .await
    }

    /// Highest sequence number already issued under `prefix`, e.g. `INV-2025-`
    pub async fn max_sequence(&self, prefix: &str) -> Result<u32, DbErr> {
        let numbers = entity::prelude::Invoice::find()
            .select_only()
            .column(entity::invoice::Column::InvoiceNumber)
            .filter(entity::invoice::Column::InvoiceNumber.starts_with(prefix))
            .into_tuple::<String>()
            .all(self.db)
            .await?;

        Ok(numbers
            .iter()
            .filter_map(|n| n.strip_prefix(prefix)?.parse::<u32>().ok())
            .max()
            .unwrap_or(0))
    }

    /// Applies a partial update, returning `None` if the invoice does not exist.
    ///
    /// Moving to paid stamps `paid_at`, moving away from paid clears it.
    pub async fn update(
        &self,
        invoice_id: i32,
        changes: UpdateInvoiceDto,
    ) -> Result<Option<entity::invoice::Model>, DbErr> {
        let Some(invoice) = self.get(invoice_id).await? else {
            return Ok(None);
        };
        let previous_status = invoice.status;

        let mut invoice = invoice.into_active_model();
        if let Some(job_id) = changes.job_id {
            invoice.job_id = ActiveValue::Set(Some(job_id));
        }
        if let Some(amount) = changes.amount_cents {
            invoice.amount_cents = ActiveValue::Set(amount);
        }
        if let Some(issue_date) = changes.issue_date {
            invoice.issue_date = ActiveValue::Set(issue_date);
        }
        if let Some(due_date) = changes.due_date {
            invoice.due_date = ActiveValue::Set(due_date);
        }
        patch_text(&mut invoice.notes, changes.notes);
        if let Some(status) = changes.status {
            invoice.status = ActiveValue::Set(status);

            if status == InvoiceStatus::Paid && previous_status != InvoiceStatus::Paid {
                invoice.paid_at = ActiveValue::Set(Some(Utc::now().naive_utc()));
            } else if status != InvoiceStatus::Paid {
                invoice.paid_at = ActiveValue::Set(None);
            }
        }
        invoice.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(invoice.update(self.db).await?))
    }

    pub async fn set_checkout_session(
        &self,
        invoice: entity::invoice::Model,
        session_id: String,
    ) -> Result<entity::invoice::Model, DbErr> {
        let mut invoice = invoice.into_active_model();
        invoice.stripe_session_id = ActiveValue::Set(Some(session_id));
        invoice.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        invoice.update(self.db).await
    }

    /// Marks an invoice paid as of now, recording the Stripe payment intent if known
    pub async fn mark_paid(
        &self,
        invoice: entity::invoice::Model,
        payment_intent: Option<String>,
    ) -> Result<entity::invoice::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let mut invoice = invoice.into_active_model();
        invoice.status = ActiveValue::Set(InvoiceStatus::Paid);
        invoice.paid_at = ActiveValue::Set(Some(now));
        if payment_intent.is_some() {
            invoice.stripe_payment_intent = ActiveValue::Set(payment_intent);
        }
        invoice.updated_at = ActiveValue::Set(now);

        invoice.update(self.db).await
    }

    /// Sent invoices whose due date is before `today`
    pub async fn list_past_due(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<entity::invoice::Model>, DbErr> {
        entity::prelude::Invoice::find()
            .filter(entity::invoice::Column::Status.eq(InvoiceStatus::Sent))
            .filter(entity::invoice::Column::DueDate.lt(today))
            .order_by_asc(entity::invoice::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn set_status(
        &self,
        invoice: entity::invoice::Model,
        status: InvoiceStatus,
    ) -> Result<entity::invoice::Model, DbErr> {
        let mut invoice = invoice.into_active_model();
        invoice.status = ActiveValue::Set(status);
        invoice.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        invoice.update(self.db).await
    }

    /// Amounts and payment times of invoices paid in `[from, to)`
    pub async fn paid_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<(i64, NaiveDateTime)>, DbErr> {
        entity::prelude::Invoice::find()
            .select_only()
            .column(entity::invoice::Column::AmountCents)
            .column(entity::invoice::Column::PaidAt)
            .filter(entity::invoice::Column::Status.eq(InvoiceStatus::Paid))
            .filter(entity::invoice::Column::PaidAt.gte(from))
            .filter(entity::invoice::Column::PaidAt.lt(to))
            .into_tuple::<(i64, NaiveDateTime)>()
            .all(self.db)
            .await
    }

    /// Sum of all sent and overdue invoices
    pub async fn outstanding_total(&self) -> Result<i64, DbErr> {
        let amounts = entity::prelude::Invoice::find()
            .select_only()
            .column(entity::invoice::Column::AmountCents)
            .filter(
                entity::invoice::Column::Status
                    .is_in([InvoiceStatus::Sent, InvoiceStatus::Overdue]),
            )
            .into_tuple::<i64>()
            .all(self.db)
            .await?;

        Ok(amounts.into_iter().sum())
    }

    pub async fn delete(&self, invoice_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Invoice::delete_by_id(invoice_id)
            .exec(self.db)
            .await
    }
}
