use chrono::{NaiveDate, Utc};
use entity::sea_orm_active_enums::{AssignmentStatus, PilotStatus};
use sea_orm::DatabaseConnection;

use crate::{
    model::pilot::{CreatePilotDto, PilotDto, PilotListParams, PilotScoreDto, UpdatePilotDto},
    server::{
        data::{
            assignment::AssignmentRepository, compliance::ComplianceDocRepository,
            pilot::PilotRepository,
        },
        error::Error,
        model::db::PilotModel,
        util::{time::days_until, validate},
    },
};

const COMPLETION_WEIGHT: f64 = 0.4;
const COMPLIANCE_WEIGHT: f64 = 0.2;
const FAA_WEIGHT: f64 = 0.2;
const INSURANCE_WEIGHT: f64 = 0.2;

/// Completion sub-score given to pilots without any assignment yet
const NEUTRAL_COMPLETION: f64 = 2.5;

const MIN_SCORE: f64 = 1.0;
const MAX_SCORE: f64 = 5.0;

pub struct PilotService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PilotService<'a> {
    /// Creates a new instance of [`PilotService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, mut pilot: CreatePilotDto) -> Result<PilotDto, Error> {
        pilot.name = validate::required_text("name", &pilot.name)?;
        pilot.email = validate::email(&pilot.email)?;
        if let Some(rate) = pilot.hourly_rate_cents {
            validate::non_negative_cents("hourly_rate_cents", rate)?;
        }
        self.ensure_email_free(&pilot.email, None).await?;

        let created = PilotRepository::new(self.db).create(pilot).await?;

        Ok(created.into())
    }

    pub async fn get(&self, pilot_id: i32) -> Result<PilotDto, Error> {
        Ok(self.find(pilot_id).await?.into())
    }

    pub async fn list(&self, params: &PilotListParams) -> Result<Vec<PilotDto>, Error> {
        let pilots = PilotRepository::new(self.db).list(params.status).await?;

        Ok(pilots.into_iter().map(PilotDto::from).collect())
    }

    pub async fn update(&self, pilot_id: i32, mut changes: UpdatePilotDto) -> Result<PilotDto, Error> {
        if let Some(name) = &changes.name {
            changes.name = Some(validate::required_text("name", name)?);
        }
        if let Some(email) = &changes.email {
            let email = validate::email(email)?;
            self.ensure_email_free(&email, Some(pilot_id)).await?;
            changes.email = Some(email);
        }
        if let Some(rate) = changes.hourly_rate_cents {
            validate::non_negative_cents("hourly_rate_cents", rate)?;
        }

        PilotRepository::new(self.db)
            .update(pilot_id, changes)
            .await?
            .map(PilotDto::from)
            .ok_or_else(|| Error::not_found("Pilot", pilot_id))
    }

    /// Deletes a pilot along with assignments, availability, documents, W-9 and payments
    pub async fn delete(&self, pilot_id: i32) -> Result<(), Error> {
        let result = PilotRepository::new(self.db).delete(pilot_id).await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("Pilot", pilot_id));
        }

        tracing::info!(pilot_id = %pilot_id, "Deleted pilot");

        Ok(())
    }

    /// Computes the pilot's quality score as of today
    pub async fn score(&self, pilot_id: i32) -> Result<PilotScoreDto, Error> {
        let pilot = self.find(pilot_id).await?;

        let assignments: Vec<AssignmentStatus> = AssignmentRepository::new(self.db)
            .list_for_pilot(pilot_id)
            .await?
            .into_iter()
            .map(|a| a.status)
            .collect();
        let (total_docs, approved_docs) = ComplianceDocRepository::new(self.db)
            .counts_for_pilot(pilot_id)
            .await?;

        Ok(quality_score(
            Utc::now().date_naive(),
            &pilot,
            &assignments,
            total_docs,
            approved_docs,
        ))
    }

    /// Fetches a pilot, returning 404 if it does not exist
    pub async fn find(&self, pilot_id: i32) -> Result<PilotModel, Error> {
        PilotRepository::new(self.db)
            .get(pilot_id)
            .await?
            .ok_or_else(|| Error::not_found("Pilot", pilot_id))
    }

    /// Fetches an active pilot for dispatch, returning 400 for an inactive one
    pub async fn find_active(&self, pilot_id: i32) -> Result<PilotModel, Error> {
        let pilot = self.find(pilot_id).await?;
        if pilot.status != PilotStatus::Active {
            return Err(Error::validation(format!(
                "Pilot {} is inactive and cannot be assigned",
                pilot_id
            )));
        }

        Ok(pilot)
    }

    async fn ensure_email_free(&self, email: &str, pilot_id: Option<i32>) -> Result<(), Error> {
        match PilotRepository::new(self.db).find_by_email(email).await? {
            Some(existing) if Some(existing.id) != pilot_id => Err(Error::conflict(format!(
                "A pilot with email {} already exists",
                email
            ))),
            _ => Ok(()),
        }
    }
}

/// Sub-score for a document expiry: 0 if missing or lapsed, 2 inside 30 days, 4 inside 90
/// days and 5 beyond that
fn expiry_bucket(today: NaiveDate, expiry: Option<NaiveDate>) -> f64 {
    let Some(expiry) = expiry else {
        return 0.0;
    };

    match days_until(today, expiry) {
        d if d < 0 => 0.0,
        d if d < 30 => 2.0,
        d if d < 90 => 4.0,
        _ => 5.0,
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Weighted pilot quality score on a 1-5 scale.
///
/// Completion counts completed assignments over all assignments, compliance counts approved
/// documents over all documents, and the FAA certificate and insurance each score by how
/// far away their expiry is.
pub fn quality_score(
    today: NaiveDate,
    pilot: &PilotModel,
    assignments: &[AssignmentStatus],
    total_docs: u64,
    approved_docs: u64,
) -> PilotScoreDto {
    let total_assignments = assignments.len() as u64;
    let completed_assignments = assignments
        .iter()
        .filter(|status| **status == AssignmentStatus::Completed)
        .count() as u64;

    let completion = if total_assignments == 0 {
        NEUTRAL_COMPLETION
    } else {
        5.0 * completed_assignments as f64 / total_assignments as f64
    };
    let compliance = if total_docs == 0 {
        0.0
    } else {
        5.0 * approved_docs as f64 / total_docs as f64
    };
    let faa = expiry_bucket(today, pilot.faa_cert_expiry);
    let insurance = expiry_bucket(today, pilot.insurance_expiry);

    let weighted = COMPLETION_WEIGHT * completion
        + COMPLIANCE_WEIGHT * compliance
        + FAA_WEIGHT * faa
        + INSURANCE_WEIGHT * insurance;

    PilotScoreDto {
        pilot_id: pilot.id,
        score: round_tenth(weighted.clamp(MIN_SCORE, MAX_SCORE)),
        completion: round_tenth(completion),
        compliance: round_tenth(compliance),
        faa,
        insurance,
        total_assignments,
        completed_assignments,
        total_docs,
        approved_docs,
    }
}

#[cfg(test)]
mod tests {
    mod quality_score {
        use chrono::{Duration, NaiveDate};
        use entity::sea_orm_active_enums::{AssignmentStatus, PilotStatus};

        use crate::server::{model::db::PilotModel, service::pilot::quality_score};

        fn today() -> NaiveDate {
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        }

        fn pilot(faa_in_days: Option<i64>, insurance_in_days: Option<i64>) -> PilotModel {
            PilotModel {
                id: 1,
                name: "Avery".to_string(),
                email: "avery@example.com".to_string(),
                phone: None,
                status: PilotStatus::Active,
                faa_cert_number: None,
                faa_cert_expiry: faa_in_days.map(|d| today() + Duration::days(d)),
                insurance_expiry: insurance_in_days.map(|d| today() + Duration::days(d)),
                hourly_rate_cents: 0,
                home_base: None,
                created_at: Default::default(),
                updated_at: Default::default(),
            }
        }

        /// Expect the perfect record to score the maximum
        #[test]
        fn perfect_record_scores_five() {
            let result = quality_score(
                today(),
                &pilot(Some(365), Some(200)),
                &[AssignmentStatus::Completed, AssignmentStatus::Completed],
                3,
                3,
            );

            assert_eq!(result.score, 5.0);
            assert_eq!(result.completion, 5.0);
            assert_eq!(result.compliance, 5.0);
        }

        /// Expect a new pilot with nothing on file to be clamped up to the minimum
        #[test]
        fn empty_record_is_clamped_to_one() {
            let result = quality_score(today(), &pilot(None, None), &[], 0, 0);

            // 0.4 * 2.5 = 1.0
            assert_eq!(result.completion, 2.5);
            assert_eq!(result.compliance, 0.0);
            assert_eq!(result.score, 1.0);
        }

        /// Expect expiry buckets at the 0, 30 and 90 day boundaries
        #[test]
        fn buckets_expiry_distance() {
            let cases = [
                (Some(-1), 0.0),
                (Some(0), 2.0),
                (Some(29), 2.0),
                (Some(30), 4.0),
                (Some(89), 4.0),
                (Some(90), 5.0),
                (None, 0.0),
            ];

            for (days, expected) in cases {
                let result = quality_score(today(), &pilot(days, days), &[], 0, 0);

                assert_eq!(result.faa, expected, "faa for {:?} days", days);
                assert_eq!(result.insurance, expected, "insurance for {:?} days", days);
            }
        }

        /// Expect the weighted sum rounded to one decimal
        #[test]
        fn weights_and_rounds() {
            // completion 5 * 1/3, compliance 5 * 1/2, faa 4, insurance 2
            let result = quality_score(
                today(),
                &pilot(Some(60), Some(10)),
                &[
                    AssignmentStatus::Completed,
                    AssignmentStatus::Declined,
                    AssignmentStatus::Assigned,
                ],
                2,
                1,
            );

            // 0.4 * 1.667 + 0.2 * 2.5 + 0.2 * 4 + 0.2 * 2 = 2.367
            assert_eq!(result.score, 2.4);
            assert_eq!(result.completion, 1.7);
            assert_eq!(result.total_assignments, 3);
            assert_eq!(result.completed_assignments, 1);
        }
    }

    mod score {
        use entity::sea_orm_active_enums::{
            AssignmentStatus, ComplianceDocType, ComplianceStatus, JobStatus, PilotStatus,
        };
        use hangar_test_utils::prelude::*;

        use crate::server::{
            error::{request::RequestError, Error},
            service::pilot::PilotService,
        };

        /// Expect counts gathered from assignments and documents
        #[tokio::test]
        async fn gathers_counts() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let client = test.crm().insert_client("Acme", None).await?;
            let pilot = test
                .crm()
                .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
                .await?;
            for (title, status) in [
                ("One", AssignmentStatus::Completed),
                ("Two", AssignmentStatus::Assigned),
            ] {
                let job = test
                    .crm()
                    .insert_job(client.id, title, JobStatus::Scheduled, None)
                    .await?;
                test.crm().insert_assignment(job.id, pilot.id, status).await?;
            }
            test.crm()
                .insert_compliance_doc(
                    pilot.id,
                    ComplianceDocType::Insurance,
                    ComplianceStatus::Approved,
                    None,
                )
                .await?;

            let result = PilotService::new(&test.db).score(pilot.id).await.unwrap();

            assert_eq!(result.total_assignments, 2);
            assert_eq!(result.completed_assignments, 1);
            assert_eq!(result.total_docs, 1);
            assert_eq!(result.approved_docs, 1);
            assert_eq!(result.completion, 2.5);
            assert_eq!(result.compliance, 5.0);

            Ok(())
        }

        /// Expect 404 for a pilot that does not exist
        #[tokio::test]
        async fn fails_for_nonexistent_pilot() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;

            let result = PilotService::new(&test.db).score(1).await;

            assert!(matches!(
                result,
                Err(Error::RequestError(RequestError::NotFound { .. }))
            ));

            Ok(())
        }
    }

    mod create {
        use entity::sea_orm_active_enums::PilotStatus;
        use hangar_test_utils::prelude::*;

        use crate::{
            model::pilot::CreatePilotDto,
            server::{
                error::{request::RequestError, Error},
                service::pilot::PilotService,
            },
        };

        fn new_pilot(email: &str) -> CreatePilotDto {
            CreatePilotDto {
                name: "Sam".to_string(),
                email: email.to_string(),
                phone: None,
                status: None,
                faa_cert_number: None,
                faa_cert_expiry: None,
                insurance_expiry: None,
                hourly_rate_cents: None,
                home_base: None,
            }
        }

        /// Expect 409 for an email already used by another pilot
        #[tokio::test]
        async fn rejects_duplicate_email() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            test.crm()
                .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
                .await?;

            let result = PilotService::new(&test.db)
                .create(new_pilot("Avery@Example.com"))
                .await;

            assert!(matches!(
                result,
                Err(Error::RequestError(RequestError::Conflict(_)))
            ));

            Ok(())
        }

        /// Expect 400 for a negative hourly rate
        #[tokio::test]
        async fn rejects_negative_rate() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;

            let mut pilot = new_pilot("sam@example.com");
            pilot.hourly_rate_cents = Some(-1);
            let result = PilotService::new(&test.db).create(pilot).await;

            assert!(matches!(
                result,
                Err(Error::RequestError(RequestError::Validation(_)))
            ));

            Ok(())
        }
    }
}
