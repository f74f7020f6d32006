use chrono::Utc;
use entity::sea_orm_active_enums::AssignmentStatus;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    DeleteResult, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};

pub struct AssignmentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AssignmentRepository<'a, C> {
    /// Creates a new instance of [`AssignmentRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        job_id: i32,
        pilot_id: i32,
        pay_cents: i64,
    ) -> Result<entity::job_assignment::Model, DbErr> {
        let now = Utc::now().naive_utc();

        entity::job_assignment::ActiveModel {
            job_id: ActiveValue::Set(job_id),
            pilot_id: ActiveValue::Set(pilot_id),
            status: ActiveValue::Set(AssignmentStatus::Assigned),
            pay_cents: ActiveValue::Set(pay_cents),
            assigned_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(
        &self,
        job_id: i32,
        pilot_id: i32,
    ) -> Result<Option<entity::job_assignment::Model>, DbErr> {
        entity::prelude::JobAssignment::find()
            .filter(entity::job_assignment::Column::JobId.eq(job_id))
            .filter(entity::job_assignment::Column::PilotId.eq(pilot_id))
            .one(self.db)
            .await
    }

    /// Assignments of a job with their pilots, in assignment order
    pub async fn list_for_job(
        &self,
        job_id: i32,
    ) -> Result<Vec<(entity::job_assignment::Model, Option<entity::pilot::Model>)>, DbErr> {
        entity::prelude::JobAssignment::find()
            .filter(entity::job_assignment::Column::JobId.eq(job_id))
            .find_also_related(entity::prelude::Pilot)
            .order_by_asc(entity::job_assignment::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn list_for_pilot(
        &self,
        pilot_id: i32,
    ) -> Result<Vec<entity::job_assignment::Model>, DbErr> {
        entity::prelude::JobAssignment::find()
            .filter(entity::job_assignment::Column::PilotId.eq(pilot_id))
            .all(self.db)
            .await
    }

    pub async fn update_status(
        &self,
        assignment: entity::job_assignment::Model,
        status: AssignmentStatus,
    ) -> Result<entity::job_assignment::Model, DbErr> {
        let mut assignment = assignment.into_active_model();
        assignment.status = ActiveValue::Set(status);
        assignment.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        assignment.update(self.db).await
    }

    /// Marks every assigned or accepted assignment of a job completed
    ///
    /// Returns the number of assignments updated.
    pub async fn complete_open_for_job(&self, job_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::JobAssignment::update_many()
            .col_expr(
                entity::job_assignment::Column::Status,
                Expr::value(AssignmentStatus::Completed),
            )
            .col_expr(
                entity::job_assignment::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::job_assignment::Column::JobId.eq(job_id))
            .filter(
                entity::job_assignment::Column::Status
                    .is_in([AssignmentStatus::Assigned, AssignmentStatus::Accepted]),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn delete(&self, job_id: i32, pilot_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::JobAssignment::delete_many()
            .filter(entity::job_assignment::Column::JobId.eq(job_id))
            .filter(entity::job_assignment::Column::PilotId.eq(pilot_id))
            .exec(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    mod complete_open_for_job {
        use entity::sea_orm_active_enums::{AssignmentStatus, JobStatus, PilotStatus};
        use hangar_test_utils::prelude::*;

        use crate::server::data::assignment::AssignmentRepository;

        /// Expect assigned and accepted rows completed and declined rows untouched
        #[tokio::test]
        async fn completes_only_open_assignments() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let client = test.crm().insert_client("Acme", None).await?;
            let job = test
                .crm()
                .insert_job(client.id, "Survey", JobStatus::InProgress, None)
                .await?;
            let mut pilots = Vec::new();
            for (i, status) in [
                AssignmentStatus::Assigned,
                AssignmentStatus::Accepted,
                AssignmentStatus::Declined,
            ]
            .into_iter()
            .enumerate()
            {
                let pilot = test
                    .crm()
                    .insert_pilot("Pilot", &format!("p{}@example.com", i), PilotStatus::Active)
                    .await?;
                test.crm().insert_assignment(job.id, pilot.id, status).await?;
                pilots.push(pilot);
            }

            let repo = AssignmentRepository::new(&test.db);
            let updated = repo.complete_open_for_job(job.id).await?;

            assert_eq!(updated, 2);
            let declined = repo.get(job.id, pilots[2].id).await?.unwrap();
            assert_eq!(declined.status, AssignmentStatus::Declined);

            Ok(())
        }
    }

    mod list_for_job {
        use entity::sea_orm_active_enums::{AssignmentStatus, JobStatus, PilotStatus};
        use hangar_test_utils::prelude::*;

        use crate::server::data::assignment::AssignmentRepository;

        /// Expect assignments to come back with their pilot
        #[tokio::test]
        async fn includes_pilot() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let client = test.crm().insert_client("Acme", None).await?;
            let job = test
                .crm()
                .insert_job(client.id, "Survey", JobStatus::Scheduled, None)
                .await?;
            let pilot = test
                .crm()
                .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
                .await?;
            test.crm()
                .insert_assignment(job.id, pilot.id, AssignmentStatus::Assigned)
                .await?;

            let repo = AssignmentRepository::new(&test.db);
            let result = repo.list_for_job(job.id).await?;

            assert_eq!(result.len(), 1);
            assert_eq!(result[0].1.as_ref().map(|p| p.name.as_str()), Some("Avery"));

            Ok(())
        }
    }
}
