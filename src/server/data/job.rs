use chrono::Utc;
use entity::sea_orm_active_enums::JobStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    model::job::{JobListParams, UpdateJobDto},
    server::data::patch_text,
};

pub struct JobRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

/// Fields of a new job
pub struct NewJob {
    pub client_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub scheduled_date: Option<chrono::NaiveDate>,
    pub status: JobStatus,
    pub price_cents: i64,
    pub tracking_token: String,
}

impl<'a, C: ConnectionTrait> JobRepository<'a, C> {
    /// Creates a new instance of [`JobRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, job: NewJob) -> Result<entity::job::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let completed_at = match job.status {
            JobStatus::Completed => Some(now),
            _ => None,
        };

        let job = entity::job::ActiveModel {
            client_id: ActiveValue::Set(job.client_id),
            title: ActiveValue::Set(job.title),
            description: ActiveValue::Set(job.description),
            location: ActiveValue::Set(job.location),
            scheduled_date: ActiveValue::Set(job.scheduled_date),
            status: ActiveValue::Set(job.status),
            price_cents: ActiveValue::Set(job.price_cents),
            tracking_token: ActiveValue::Set(job.tracking_token),
            completed_at: ActiveValue::Set(completed_at),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        job.insert(self.db).await
    }

    pub async fn get(&self, job_id: i32) -> Result<Option<entity::job::Model>, DbErr> {
        entity::prelude::Job::find_by_id(job_id).one(self.db).await
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<entity::job::Model>, DbErr> {
        entity::prelude::Job::find()
            .filter(entity::job::Column::TrackingToken.eq(token))
            .one(self.db)
            .await
    }

    /// Finds a client's job by title and scheduled date, an unscheduled job matching only
    /// another unscheduled one
    pub async fn find_match(
        &self,
        client_id: i32,
        title: &str,
        scheduled_date: Option<chrono::NaiveDate>,
    ) -> Result<Option<entity::job::Model>, DbErr> {
        let query = entity::prelude::Job::find()
            .filter(entity::job::Column::ClientId.eq(client_id))
            .filter(entity::job::Column::Title.eq(title.trim()));

        let query = match scheduled_date {
            Some(date) => query.filter(entity::job::Column::ScheduledDate.eq(date)),
            None => query.filter(entity::job::Column::ScheduledDate.is_null()),
        };

        query
            .order_by_asc(entity::job::Column::Id)
            .one(self.db)
            .await
    }

    /// Lists jobs matching every given filter, soonest scheduled first with unscheduled
    /// jobs last
    pub async fn list(&self, filter: &JobListParams) -> Result<Vec<entity::job::Model>, DbErr> {
        let mut query = entity::prelude::Job::find();

        if let Some(status) = filter.status {
            query = query.filter(entity::job::Column::Status.eq(status));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(entity::job::Column::ClientId.eq(client_id));
        }
        if let Some(pilot_id) = filter.pilot_id {
            let job_ids = entity::prelude::JobAssignment::find()
                .select_only()
                .column(entity::job_assignment::Column::JobId)
                .filter(entity::job_assignment::Column::PilotId.eq(pilot_id))
                .into_tuple::<i32>()
                .all(self.db)
                .await?;

            query = query.filter(entity::job::Column::Id.is_in(job_ids));
        }
        if let Some(from) = filter.from {
            query = query.filter(entity::job::Column::ScheduledDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(entity::job::Column::ScheduledDate.lte(to));
        }

        let mut jobs = query
            .order_by_asc(entity::job::Column::Id)
            .all(self.db)
            .await?;

        jobs.sort_by_key(|job| (job.scheduled_date.is_none(), job.scheduled_date, job.id));

        Ok(jobs)
    }

    /// Applies a partial update, returning `None` if the job does not exist.
    ///
    /// Moving a job to completed stamps `completed_at`, moving it away clears it.
    pub async fn update(
        &self,
        job_id: i32,
        changes: UpdateJobDto,
    ) -> Result<Option<entity::job::Model>, DbErr> {
        let Some(job) = self.get(job_id).await? else {
            return Ok(None);
        };
        let previous_status = job.status;

        let mut job = job.into_active_model();
        if let Some(title) = changes.title {
            job.title = ActiveValue::Set(title.trim().to_string());
        }
        patch_text(&mut job.description, changes.description);
        patch_text(&mut job.location, changes.location);
        if let Some(date) = changes.scheduled_date {
            job.scheduled_date = ActiveValue::Set(Some(date));
        }
        if let Some(price) = changes.price_cents {
            job.price_cents = ActiveValue::Set(price);
        }
        if let Some(status) = changes.status {
            job.status = ActiveValue::Set(status);

            if status == JobStatus::Completed && previous_status != JobStatus::Completed {
                job.completed_at = ActiveValue::Set(Some(Utc::now().naive_utc()));
            } else if status != JobStatus::Completed {
                job.completed_at = ActiveValue::Set(None);
            }
        }
        job.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(job.update(self.db).await?))
    }

    pub async fn set_status(
        &self,
        job: entity::job::Model,
        status: JobStatus,
    ) -> Result<entity::job::Model, DbErr> {
        let mut job = job.into_active_model();
        job.status = ActiveValue::Set(status);
        job.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        job.update(self.db).await
    }

    /// Deletes a job along with its assignments, files and messages
    ///
    /// Returns OK regardless of job existing, to confirm the deletion result
    /// check the [`DeleteResult::rows_affected`] field.
    pub async fn delete(&self, job_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Job::delete_by_id(job_id)
            .exec(self.db)
            .await
    }

    pub async fn count_by_status(&self, status: JobStatus) -> Result<u64, DbErr> {
        entity::prelude::Job::find()
            .filter(entity::job::Column::Status.eq(status))
            .count(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    mod create {
        use entity::sea_orm_active_enums::JobStatus;
        use hangar_test_utils::prelude::*;

        use crate::server::data::job::{JobRepository, NewJob};

        fn new_job(client_id: i32, token: &str) -> NewJob {
            NewJob {
                client_id,
                title: "Roof inspection".to_string(),
                description: None,
                location: None,
                scheduled_date: None,
                status: JobStatus::Pending,
                price_cents: 120_000,
                tracking_token: token.to_string(),
            }
        }

        /// Expect Error when the tracking token is already in use
        #[tokio::test]
        async fn fails_for_duplicate_token() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let client = test.crm().insert_client("Acme", None).await?;

            let job_repo = JobRepository::new(&test.db);
            job_repo.create(new_job(client.id, "abc")).await?;
            let result = job_repo.create(new_job(client.id, "abc")).await;

            assert!(result.is_err());

            Ok(())
        }

        /// Expect Error for a client that does not exist
        #[tokio::test]
        async fn fails_for_nonexistent_client() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;

            let job_repo = JobRepository::new(&test.db);
            let result = job_repo.create(new_job(1, "abc")).await;

            assert!(result.is_err());

            Ok(())
        }
    }

    mod list {
        use chrono::NaiveDate;
        use entity::sea_orm_active_enums::{AssignmentStatus, JobStatus, PilotStatus};
        use hangar_test_utils::prelude::*;

        use crate::{model::job::JobListParams, server::data::job::JobRepository};

        /// Expect every filter to apply and unscheduled jobs to sort last
        #[tokio::test]
        async fn applies_filters() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let acme = test.crm().insert_client("Acme", None).await?;
            let other = test.crm().insert_client("Other", None).await?;
            let pilot = test
                .crm()
                .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
                .await?;
            let june = |d| NaiveDate::from_ymd_opt(2025, 6, d);

            let late = test
                .crm()
                .insert_job(acme.id, "Late", JobStatus::Scheduled, june(20))
                .await?;
            let early = test
                .crm()
                .insert_job(acme.id, "Early", JobStatus::Scheduled, june(2))
                .await?;
            let unscheduled = test
                .crm()
                .insert_job(acme.id, "Unscheduled", JobStatus::Pending, None)
                .await?;
            test.crm()
                .insert_job(other.id, "Other", JobStatus::Scheduled, june(3))
                .await?;
            test.crm()
                .insert_assignment(late.id, pilot.id, AssignmentStatus::Assigned)
                .await?;

            let job_repo = JobRepository::new(&test.db);

            let by_client = job_repo
                .list(&JobListParams {
                    client_id: Some(acme.id),
                    ..Default::default()
                })
                .await?;
            let ids: Vec<_> = by_client.iter().map(|j| j.id).collect();
            assert_eq!(ids, vec![early.id, late.id, unscheduled.id]);

            let by_pilot = job_repo
                .list(&JobListParams {
                    pilot_id: Some(pilot.id),
                    ..Default::default()
                })
                .await?;
            assert_eq!(by_pilot.len(), 1);
            assert_eq!(by_pilot[0].id, late.id);

            let by_range = job_repo
                .list(&JobListParams {
                    from: june(1),
                    to: june(3),
                    ..Default::default()
                })
                .await?;
            assert_eq!(by_range.len(), 2);

            let by_status = job_repo
                .list(&JobListParams {
                    status: Some(JobStatus::Pending),
                    ..Default::default()
                })
                .await?;
            assert_eq!(by_status.len(), 1);

            Ok(())
        }
    }

    mod update {
        use entity::sea_orm_active_enums::JobStatus;
        use hangar_test_utils::prelude::*;

        use crate::{model::job::UpdateJobDto, server::data::job::JobRepository};

        /// Expect completed_at stamped on completion and cleared when reopened
        #[tokio::test]
        async fn tracks_completion_time() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let client = test.crm().insert_client("Acme", None).await?;
            let job = test
                .crm()
                .insert_job(client.id, "Survey", JobStatus::InProgress, None)
                .await?;

            let job_repo = JobRepository::new(&test.db);
            let completed = job_repo
                .update(
                    job.id,
                    UpdateJobDto {
                        status: Some(JobStatus::Completed),
                        ..Default::default()
                    },
                )
                .await?
                .unwrap();
            assert!(completed.completed_at.is_some());

            let reopened = job_repo
                .update(
                    job.id,
                    UpdateJobDto {
                        status: Some(JobStatus::InProgress),
                        ..Default::default()
                    },
                )
                .await?
                .unwrap();
            assert!(reopened.completed_at.is_none());

            Ok(())
        }
    }
}
