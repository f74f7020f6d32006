use chrono::{NaiveDate, Utc};
use entity::sea_orm_active_enums::{
    AssignmentStatus, ComplianceDocType, ComplianceStatus, ContractStatus, InvoiceStatus,
    JobStatus, LeadStatus, PilotPaymentStatus, PilotStatus,
};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn crm(&self) -> CrmFixtures<'_> {
        CrmFixtures { context: self }
    }
}

pub struct CrmFixtures<'a> {
    context: &'a TestContext,
}

impl<'a> CrmFixtures<'a> {
    pub async fn insert_client(
        &self,
        name: &str,
        email: Option<&str>,
    ) -> Result<entity::client::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::Client::insert(entity::client::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            contact_name: ActiveValue::Set(None),
            email: ActiveValue::Set(email.map(str::to_string)),
            phone: ActiveValue::Set(None),
            address: ActiveValue::Set(None),
            notes: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?)
    }

    pub async fn insert_pilot(
        &self,
        name: &str,
        email: &str,
        status: PilotStatus,
    ) -> Result<entity::pilot::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::Pilot::insert(entity::pilot::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            email: ActiveValue::Set(email.to_string()),
            phone: ActiveValue::Set(Some("+15550100".to_string())),
            status: ActiveValue::Set(status),
            faa_cert_number: ActiveValue::Set(None),
            faa_cert_expiry: ActiveValue::Set(None),
            insurance_expiry: ActiveValue::Set(None),
            hourly_rate_cents: ActiveValue::Set(7500),
            home_base: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?)
    }

    /// Sets the certificate and insurance expiry dates of a pilot
    pub async fn set_pilot_expiries(
        &self,
        pilot: entity::pilot::Model,
        faa_cert_expiry: Option<NaiveDate>,
        insurance_expiry: Option<NaiveDate>,
    ) -> Result<entity::pilot::Model, TestError> {
        use sea_orm::{ActiveModelTrait, IntoActiveModel};

        let mut pilot = pilot.into_active_model();
        pilot.faa_cert_expiry = ActiveValue::Set(faa_cert_expiry);
        pilot.insurance_expiry = ActiveValue::Set(insurance_expiry);

        Ok(pilot.update(&self.context.db).await?)
    }

    pub async fn insert_job(
        &self,
        client_id: i32,
        title: &str,
        status: JobStatus,
        scheduled_date: Option<NaiveDate>,
    ) -> Result<entity::job::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::Job::insert(entity::job::ActiveModel {
            client_id: ActiveValue::Set(client_id),
            title: ActiveValue::Set(title.to_string()),
            description: ActiveValue::Set(None),
            location: ActiveValue::Set(Some("Boulder, CO".to_string())),
            scheduled_date: ActiveValue::Set(scheduled_date),
            status: ActiveValue::Set(status),
            price_cents: ActiveValue::Set(150_000),
            tracking_token: ActiveValue::Set(format!("token-{}-{}", client_id, title)),
            completed_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?)
    }

    pub async fn insert_assignment(
        &self,
        job_id: i32,
        pilot_id: i32,
        status: AssignmentStatus,
    ) -> Result<entity::job_assignment::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::JobAssignment::insert(entity::job_assignment::ActiveModel {
                job_id: ActiveValue::Set(job_id),
                pilot_id: ActiveValue::Set(pilot_id),
                status: ActiveValue::Set(status),
                pay_cents: ActiveValue::Set(40_000),
                assigned_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }

    pub async fn insert_invoice(
        &self,
        client_id: i32,
        invoice_number: &str,
        amount_cents: i64,
        status: InvoiceStatus,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<entity::invoice::Model, TestError> {
        let now = Utc::now().naive_utc();
        let paid_at = match status {
            InvoiceStatus::Paid => Some(issue_date.and_hms_opt(12, 0, 0).unwrap_or(now)),
            _ => None,
        };

        Ok(entity::prelude::Invoice::insert(entity::invoice::ActiveModel {
            invoice_number: ActiveValue::Set(invoice_number.to_string()),
            client_id: ActiveValue::Set(client_id),
            job_id: ActiveValue::Set(None),
            amount_cents: ActiveValue::Set(amount_cents),
            status: ActiveValue::Set(status),
            issue_date: ActiveValue::Set(issue_date),
            due_date: ActiveValue::Set(due_date),
            paid_at: ActiveValue::Set(paid_at),
            stripe_session_id: ActiveValue::Set(None),
            stripe_payment_intent: ActiveValue::Set(None),
            notes: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?)
    }

    pub async fn insert_contract(
        &self,
        client_id: i32,
        title: &str,
        status: ContractStatus,
    ) -> Result<entity::contract::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::Contract::insert(entity::contract::ActiveModel {
            client_id: ActiveValue::Set(client_id),
            title: ActiveValue::Set(title.to_string()),
            status: ActiveValue::Set(status),
            provider: ActiveValue::Set(None),
            external_id: ActiveValue::Set(None),
            document_url: ActiveValue::Set(Some("https://files.example.com/msa.pdf".to_string())),
            signer_name: ActiveValue::Set(Some("Dana Client".to_string())),
            signer_email: ActiveValue::Set(Some("dana@example.com".to_string())),
            value_cents: ActiveValue::Set(500_000),
            sent_at: ActiveValue::Set(None),
            signed_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?)
    }

    pub async fn insert_lead(
        &self,
        name: &str,
        email: Option<&str>,
        status: LeadStatus,
    ) -> Result<entity::lead::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::Lead::insert(entity::lead::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            company: ActiveValue::Set(Some(format!("{} Holdings", name))),
            email: ActiveValue::Set(email.map(str::to_string)),
            phone: ActiveValue::Set(None),
            source: ActiveValue::Set(Some("referral".to_string())),
            status: ActiveValue::Set(status),
            estimated_value_cents: ActiveValue::Set(250_000),
            notes: ActiveValue::Set(None),
            converted_client_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?)
    }

    pub async fn insert_compliance_doc(
        &self,
        pilot_id: i32,
        doc_type: ComplianceDocType,
        status: ComplianceStatus,
        expires_on: Option<NaiveDate>,
    ) -> Result<entity::compliance_doc::Model, TestError> {
        Ok(
            entity::prelude::ComplianceDoc::insert(entity::compliance_doc::ActiveModel {
                pilot_id: ActiveValue::Set(pilot_id),
                doc_type: ActiveValue::Set(doc_type),
                file_url: ActiveValue::Set(None),
                expires_on: ActiveValue::Set(expires_on),
                status: ActiveValue::Set(status),
                notes: ActiveValue::Set(None),
                reviewed_by: ActiveValue::Set(None),
                reviewed_at: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }

    pub async fn insert_availability(
        &self,
        pilot_id: i32,
        date: NaiveDate,
        available: bool,
    ) -> Result<entity::pilot_availability::Model, TestError> {
        Ok(entity::prelude::PilotAvailability::insert(
            entity::pilot_availability::ActiveModel {
                pilot_id: ActiveValue::Set(pilot_id),
                date: ActiveValue::Set(date),
                available: ActiveValue::Set(available),
                updated_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            },
        )
        .exec_with_returning(&self.context.db)
        .await?)
    }

    pub async fn insert_payment(
        &self,
        pilot_id: i32,
        amount_cents: i64,
        status: PilotPaymentStatus,
    ) -> Result<entity::pilot_payment::Model, TestError> {
        let now = Utc::now().naive_utc();
        let paid_at = match status {
            PilotPaymentStatus::Paid => Some(now),
            PilotPaymentStatus::Pending => None,
        };

        Ok(
            entity::prelude::PilotPayment::insert(entity::pilot_payment::ActiveModel {
                pilot_id: ActiveValue::Set(pilot_id),
                job_id: ActiveValue::Set(None),
                amount_cents: ActiveValue::Set(amount_cents),
                status: ActiveValue::Set(status),
                method: ActiveValue::Set(Some("ach".to_string())),
                reference: ActiveValue::Set(None),
                paid_at: ActiveValue::Set(paid_at),
                created_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }
}
