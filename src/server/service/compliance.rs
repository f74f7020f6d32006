use chrono::NaiveDate;
use entity::sea_orm_active_enums::{ComplianceDocType, ComplianceStatus};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::compliance::{
        ComplianceDocDto, ComplianceListParams, CreateComplianceDocDto, ReviewComplianceDocDto,
        SubmitW9Dto, W9Dto,
    },
    server::{
        data::{
            compliance::{ComplianceDocRepository, NewComplianceDoc},
            pilot::PilotRepository,
            w9::{NewW9, W9Repository},
        },
        error::{auth::AuthError, Error},
        integration::{notify::Email, Integrations},
        model::{access::CurrentUser, db::ComplianceDocModel},
        util::{time::add_days, validate},
    },
};

/// Look-ahead window of the expiring list when none is given
pub const DEFAULT_EXPIRING_DAYS: i64 = 30;

pub const MAX_EXPIRING_DAYS: i64 = 366;

/// Days before expiry on which a reminder goes out
pub const REMINDER_DAYS: [i64; 3] = [30, 7, 1];

pub struct ComplianceService<'a> {
    db: &'a DatabaseConnection,
    integrations: &'a Integrations,
}

/// Reduces an SSN or EIN to its last four digits.
///
/// Dashes and spaces are ignored, anything else must be one of exactly nine digits.
pub fn tin_last4(tin: &str) -> Result<String, Error> {
    let digits: String = tin.chars().filter(|c| !matches!(c, '-' | ' ')).collect();
    if digits.len() != 9 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation("tin must contain exactly 9 digits"));
    }

    Ok(digits[5..].to_string())
}

fn doc_type_label(doc_type: ComplianceDocType) -> &'static str {
    match doc_type {
        ComplianceDocType::FaaCert => "FAA certificate",
        ComplianceDocType::Insurance => "Insurance certificate",
        ComplianceDocType::W9 => "W-9",
        ComplianceDocType::Other => "Compliance document",
    }
}

impl<'a> ComplianceService<'a> {
    /// Creates a new instance of [`ComplianceService`]
    pub fn new(db: &'a DatabaseConnection, integrations: &'a Integrations) -> Self {
        Self { db, integrations }
    }

    /// Documents matching `params`; pilot accounts only see their own
    pub async fn list(
        &self,
        user: &CurrentUser,
        mut params: ComplianceListParams,
    ) -> Result<Vec<ComplianceDocDto>, Error> {
        if !user.is_back_office() {
            let pilot_id = user.own_pilot_id().ok_or(AuthError::Forbidden)?;
            params.pilot_id = Some(pilot_id);
        }

        let docs = ComplianceDocRepository::new(self.db).list(&params).await?;

        Ok(docs.into_iter().map(ComplianceDocDto::from).collect())
    }

    /// Uploads a document pending review. Pilot accounts may only upload their own.
    pub async fn create(
        &self,
        user: &CurrentUser,
        doc: CreateComplianceDocDto,
    ) -> Result<ComplianceDocDto, Error> {
        user.require_pilot_or_back_office(doc.pilot_id)?;
        if PilotRepository::new(self.db).get(doc.pilot_id).await?.is_none() {
            return Err(Error::validation(format!(
                "Pilot {} does not exist",
                doc.pilot_id
            )));
        }

        let created = ComplianceDocRepository::new(self.db)
            .create(NewComplianceDoc {
                pilot_id: doc.pilot_id,
                doc_type: doc.doc_type,
                file_url: doc.file_url,
                expires_on: doc.expires_on,
                status: ComplianceStatus::Pending,
                notes: doc.notes,
            })
            .await?;

        Ok(created.into())
    }

    /// Records a review decision made by `reviewer`
    pub async fn review(
        &self,
        reviewer: &CurrentUser,
        doc_id: i32,
        review: ReviewComplianceDocDto,
    ) -> Result<ComplianceDocDto, Error> {
        reviewer.require_back_office()?;

        let doc_repo = ComplianceDocRepository::new(self.db);
        let doc = doc_repo
            .get(doc_id)
            .await?
            .ok_or_else(|| Error::not_found("Compliance document", doc_id))?;

        let reviewed = doc_repo
            .review(doc, reviewer.id, review.status, review.notes)
            .await?;

        tracing::info!(
            doc_id = %reviewed.id,
            reviewer_id = %reviewer.id,
            "Reviewed compliance document: {:?}",
            reviewed.status
        );

        Ok(reviewed.into())
    }

    pub async fn delete(&self, doc_id: i32) -> Result<(), Error> {
        let result = ComplianceDocRepository::new(self.db).delete(doc_id).await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("Compliance document", doc_id));
        }

        Ok(())
    }

    /// Documents expiring between `today` and `days` from now, soonest first
    pub async fn expiring(
        &self,
        today: NaiveDate,
        days: Option<i64>,
    ) -> Result<Vec<ComplianceDocDto>, Error> {
        let days = days.unwrap_or(DEFAULT_EXPIRING_DAYS);
        if !(0..=MAX_EXPIRING_DAYS).contains(&days) {
            return Err(Error::validation(format!(
                "days must be between 0 and {}",
                MAX_EXPIRING_DAYS
            )));
        }

        let docs = ComplianceDocRepository::new(self.db)
            .list_expiring(today, add_days(today, days)?)
            .await?;

        Ok(docs.into_iter().map(ComplianceDocDto::from).collect())
    }

    pub async fn get_w9(&self, user: &CurrentUser, pilot_id: i32) -> Result<W9Dto, Error> {
        user.require_pilot_or_back_office(pilot_id)?;

        W9Repository::new(self.db)
            .get_for_pilot(pilot_id)
            .await?
            .map(W9Dto::from)
            .ok_or_else(|| Error::not_found("W-9 for pilot", pilot_id))
    }

    /// Stores a pilot's W-9 keeping only the last four TIN digits, and files a `w9`
    /// compliance document for review.
    ///
    /// # Returns
    /// - `Ok(W9Dto)` - Form stored, replacing any earlier submission
    /// - `Err(Error::AuthError)` - A pilot account submitting for another pilot (403)
    /// - `Err(Error::RequestError)` - Pilot missing (404), blank fields or a malformed TIN (400)
    pub async fn submit_w9(
        &self,
        user: &CurrentUser,
        pilot_id: i32,
        form: SubmitW9Dto,
    ) -> Result<W9Dto, Error> {
        user.require_pilot_or_back_office(pilot_id)?;

        let form = NewW9 {
            legal_name: validate::required_text("legal_name", &form.legal_name)?,
            business_name: form
                .business_name
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty()),
            tax_classification: validate::required_text(
                "tax_classification",
                &form.tax_classification,
            )?,
            tin_last4: tin_last4(&form.tin)?,
            address: validate::required_text("address", &form.address)?,
        };

        let txn = self.db.begin().await?;

        if PilotRepository::new(&txn).get(pilot_id).await?.is_none() {
            return Err(Error::not_found("Pilot", pilot_id));
        }

        let stored = W9Repository::new(&txn).upsert(pilot_id, form).await?;
        ComplianceDocRepository::new(&txn)
            .create(NewComplianceDoc {
                pilot_id,
                doc_type: ComplianceDocType::W9,
                file_url: None,
                expires_on: None,
                status: ComplianceStatus::Pending,
                notes: Some("Submitted online".to_string()),
            })
            .await?;

        txn.commit().await?;

        tracing::info!(pilot_id = %pilot_id, "Stored W-9");

        Ok(stored.into())
    }

    /// Emails the pilot and admin about documents expiring in 30, 7 or 1 days, or which
    /// expired yesterday.
    ///
    /// Returns the number of documents reminded about.
    pub async fn send_expiry_reminders(&self, today: NaiveDate) -> Result<usize, Error> {
        let mut dates = Vec::with_capacity(REMINDER_DAYS.len() + 1);
        for days in REMINDER_DAYS {
            dates.push(add_days(today, days)?);
        }
        dates.push(add_days(today, -1)?);

        let docs = ComplianceDocRepository::new(self.db)
            .list_expiring_on(&dates)
            .await?;
        let count = docs.len();

        let pilot_repo = PilotRepository::new(self.db);
        let notifier = self.integrations.notifier();
        let admin_email = notifier.admin_email().map(str::to_string);

        for doc in docs {
            let Some(pilot) = pilot_repo.get(doc.pilot_id).await? else {
                continue;
            };
            let subject = reminder_subject(&doc, today);

            let body = format!(
                "{} for {} {}.\n",
                doc_type_label(doc.doc_type),
                pilot.name,
                subject.to_lowercase()
            );
            notifier.spawn_email(Email {
                to: pilot.email.clone(),
                subject: subject.clone(),
                body: body.clone(),
            });
            if let Some(admin) = &admin_email {
                notifier.spawn_email(Email {
                    to: admin.clone(),
                    subject: format!("{}: {}", pilot.name, subject),
                    body,
                });
            }
        }

        Ok(count)
    }
}

fn reminder_subject(doc: &ComplianceDocModel, today: NaiveDate) -> String {
    let label = doc_type_label(doc.doc_type);

    match doc.expires_on {
        Some(expires_on) if expires_on < today => format!("{} expired on {}", label, expires_on),
        Some(expires_on) => format!("{} expires on {}", label, expires_on),
        None => format!("{} needs renewal", label),
    }
}
