use entity::sea_orm_active_enums::{AssignmentStatus, JobStatus};
use sea_orm::DatabaseConnection;

use crate::{
    model::job::{
        AssignmentDto, CreateAssignmentDto, CreateJobDto, CreateJobFileDto, JobDto, JobFileDto,
        JobListParams, TrackingDto, UpdateJobDto,
    },
    server::{
        data::{
            assignment::AssignmentRepository,
            client::ClientRepository,
            job::{JobRepository, NewJob},
            job_file::{JobFileRepository, NewJobFile},
        },
        error::{auth::AuthError, Error},
        integration::{notify::Email, Integrations},
        model::{
            access::CurrentUser,
            db::{JobAssignmentModel, JobModel, PilotModel},
            dto::assignment_dto,
        },
        service::pilot::PilotService,
        util::validate,
    },
};

pub struct JobService<'a> {
    db: &'a DatabaseConnection,
    integrations: &'a Integrations,
}

/// Builds the job DTO, withholding the client price unless `show_price`
fn job_dto(
    job: JobModel,
    assignments: Vec<(JobAssignmentModel, Option<PilotModel>)>,
    show_price: bool,
) -> JobDto {
    JobDto {
        id: job.id,
        client_id: job.client_id,
        title: job.title,
        description: job.description,
        location: job.location,
        scheduled_date: job.scheduled_date,
        status: job.status,
        price_cents: show_price.then_some(job.price_cents),
        tracking_token: job.tracking_token,
        completed_at: job.completed_at,
        created_at: job.created_at,
        updated_at: job.updated_at,
        assignments: assignments
            .into_iter()
            .map(|(assignment, pilot)| assignment_dto(assignment, pilot))
            .collect(),
    }
}

/// New unguessable token for the public tracking page
fn new_tracking_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl<'a> JobService<'a> {
    /// Creates a new instance of [`JobService`]
    pub fn new(db: &'a DatabaseConnection, integrations: &'a Integrations) -> Self {
        Self { db, integrations }
    }

    pub async fn create(&self, job: CreateJobDto) -> Result<JobDto, Error> {
        let title = validate::required_text("title", &job.title)?;
        let price_cents =
            validate::non_negative_cents("price_cents", job.price_cents.unwrap_or(0))?;
        if ClientRepository::new(self.db)
            .get(job.client_id)
            .await?
            .is_none()
        {
            return Err(Error::validation(format!(
                "Client {} does not exist",
                job.client_id
            )));
        }

        let created = JobRepository::new(self.db)
            .create(NewJob {
                client_id: job.client_id,
                title,
                description: job.description,
                location: job.location,
                scheduled_date: job.scheduled_date,
                status: job.status.unwrap_or(JobStatus::Pending),
                price_cents,
                tracking_token: new_tracking_token(),
            })
            .await?;

        tracing::info!(job_id = %created.id, client_id = %created.client_id, "Created job");

        Ok(job_dto(created, Vec::new(), true))
    }

    /// Jobs visible to `user` matching `params`.
    ///
    /// Pilots only see jobs they are assigned to and clients only their own jobs, whatever
    /// filters they pass.
    pub async fn list(
        &self,
        user: &CurrentUser,
        mut params: JobListParams,
    ) -> Result<Vec<JobDto>, Error> {
        if !user.is_back_office() {
            match (user.own_pilot_id(), user.own_client_id()) {
                (Some(pilot_id), _) => params.pilot_id = Some(pilot_id),
                (_, Some(client_id)) => params.client_id = Some(client_id),
                _ => return Err(AuthError::Forbidden.into()),
            }
        }

        let jobs = JobRepository::new(self.db).list(&params).await?;
        let assignment_repo = AssignmentRepository::new(self.db);

        let mut dtos = Vec::with_capacity(jobs.len());
        for job in jobs {
            let assignments = assignment_repo.list_for_job(job.id).await?;
            dtos.push(job_dto(job, assignments, show_price(user)));
        }

        Ok(dtos)
    }

    pub async fn get(&self, user: &CurrentUser, job_id: i32) -> Result<JobDto, Error> {
        let job = self.visible_job(user, job_id).await?;
        let assignments = AssignmentRepository::new(self.db)
            .list_for_job(job.id)
            .await?;

        Ok(job_dto(job, assignments, show_price(user)))
    }

    /// Fetches a job the user may see.
    ///
    /// # Returns
    /// - `Ok(JobModel)` - Back office, the job's client, or a pilot assigned to it
    /// - `Err(Error::RequestError)` - Job does not exist (404)
    /// - `Err(Error::AuthError(AuthError::Forbidden))` - Job belongs to someone else
    pub async fn visible_job(&self, user: &CurrentUser, job_id: i32) -> Result<JobModel, Error> {
        let job = self.find(job_id).await?;

        if user.is_back_office() || user.own_client_id() == Some(job.client_id) {
            return Ok(job);
        }
        if let Some(pilot_id) = user.own_pilot_id() {
            if AssignmentRepository::new(self.db)
                .get(job_id, pilot_id)
                .await?
                .is_some()
            {
                return Ok(job);
            }
        }

        Err(AuthError::Forbidden.into())
    }

    /// Applies a partial update.
    ///
    /// Completing a job completes its open assignments and posts to team chat.
    pub async fn update(&self, job_id: i32, mut changes: UpdateJobDto) -> Result<JobDto, Error> {
        if let Some(title) = &changes.title {
            changes.title = Some(validate::required_text("title", title)?);
        }
        if let Some(price) = changes.price_cents {
            validate::non_negative_cents("price_cents", price)?;
        }

        let job_repo = JobRepository::new(self.db);
        let previous = self.find(job_id).await?;
        let job = job_repo
            .update(job_id, changes)
            .await?
            .ok_or_else(|| Error::not_found("Job", job_id))?;

        let assignment_repo = AssignmentRepository::new(self.db);
        if job.status == JobStatus::Completed && previous.status != JobStatus::Completed {
            let completed = assignment_repo.complete_open_for_job(job_id).await?;

            tracing::info!(job_id = %job_id, assignments = %completed, "Job completed");

            self.integrations
                .notifier()
                .spawn_team_chat(format!("Job completed: {} (#{})", job.title, job.id));
        }

        let assignments = assignment_repo.list_for_job(job_id).await?;

        Ok(job_dto(job, assignments, true))
    }

    /// Deletes a job with its assignments, files and messages
    pub async fn delete(&self, job_id: i32) -> Result<(), Error> {
        let result = JobRepository::new(self.db).delete(job_id).await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("Job", job_id));
        }

        Ok(())
    }

    /// Assigns an active pilot to a job.
    ///
    /// A pending job becomes scheduled. The pilot is told by SMS and email without waiting
    /// for delivery.
    ///
    /// # Returns
    /// - `Ok(AssignmentDto)` - Pilot assigned
    /// - `Err(Error::RequestError)` - Job or pilot missing (404), pilot inactive or negative
    ///   pay (400), pilot already assigned (409)
    pub async fn assign(
        &self,
        job_id: i32,
        assignment: CreateAssignmentDto,
    ) -> Result<AssignmentDto, Error> {
        let pay_cents =
            validate::non_negative_cents("pay_cents", assignment.pay_cents.unwrap_or(0))?;
        let job = self.find(job_id).await?;
        let pilot = PilotService::new(self.db)
            .find_active(assignment.pilot_id)
            .await?;

        let assignment_repo = AssignmentRepository::new(self.db);
        if assignment_repo.get(job_id, pilot.id).await?.is_some() {
            return Err(Error::conflict(format!(
                "Pilot {} is already assigned to job {}",
                pilot.id, job_id
            )));
        }

        let created = assignment_repo.create(job_id, pilot.id, pay_cents).await?;
        if job.status == JobStatus::Pending {
            JobRepository::new(self.db)
                .set_status(job.clone(), JobStatus::Scheduled)
                .await?;
        }

        tracing::info!(job_id = %job_id, pilot_id = %pilot.id, "Assigned pilot");

        let when = job
            .scheduled_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "a date to be confirmed".to_string());
        let notifier = self.integrations.notifier();
        if let Some(phone) = &pilot.phone {
            notifier.spawn_sms(
                phone.clone(),
                format!("You have been assigned to \"{}\" on {}.", job.title, when),
            );
        }
        notifier.spawn_email(Email {
            to: pilot.email.clone(),
            subject: format!("New assignment: {}", job.title),
            body: format!(
                "Hi {},\n\nYou have been assigned to \"{}\" on {}{}.\n",
                pilot.name,
                job.title,
                when,
                job.location
                    .as_deref()
                    .map(|l| format!(" at {}", l))
                    .unwrap_or_default(),
            ),
        });

        Ok(assignment_dto(created, Some(pilot)))
    }

    /// Updates an assignment's status; pilots may only accept or decline
    pub async fn update_assignment(
        &self,
        user: &CurrentUser,
        job_id: i32,
        pilot_id: i32,
        status: AssignmentStatus,
    ) -> Result<AssignmentDto, Error> {
        user.require_pilot_or_back_office(pilot_id)?;
        if !user.is_back_office()
            && !matches!(status, AssignmentStatus::Accepted | AssignmentStatus::Declined)
        {
            return Err(AuthError::Forbidden.into());
        }

        let assignment_repo = AssignmentRepository::new(self.db);
        let assignment = assignment_repo
            .get(job_id, pilot_id)
            .await?
            .ok_or_else(|| Error::not_found("Assignment", format!("{}/{}", job_id, pilot_id)))?;
        if !user.is_back_office() && assignment.status == AssignmentStatus::Completed {
            return Err(Error::conflict("Assignment is already completed"));
        }

        let updated = assignment_repo.update_status(assignment, status).await?;
        let pilot = PilotService::new(self.db).find(pilot_id).await?;

        Ok(assignment_dto(updated, Some(pilot)))
    }

    pub async fn unassign(&self, job_id: i32, pilot_id: i32) -> Result<(), Error> {
        let result = AssignmentRepository::new(self.db)
            .delete(job_id, pilot_id)
            .await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found(
                "Assignment",
                format!("{}/{}", job_id, pilot_id),
            ));
        }

        Ok(())
    }

    /// Public view of a job by tracking token, without pricing or pilots
    pub async fn track(&self, token: &str) -> Result<TrackingDto, Error> {
        let job = JobRepository::new(self.db)
            .find_by_token(token)
            .await?
            .ok_or_else(|| Error::not_found("Tracking token", token))?;
        let client = ClientRepository::new(self.db)
            .get(job.client_id)
            .await?
            .ok_or_else(|| {
                Error::InternalError(format!(
                    "Client {} of job {} is missing",
                    job.client_id, job.id
                ))
            })?;

        Ok(TrackingDto {
            title: job.title,
            status: job.status,
            scheduled_date: job.scheduled_date,
            location: job.location,
            client_name: client.name,
            completed_at: job.completed_at,
        })
    }

    pub async fn list_files(
        &self,
        user: &CurrentUser,
        job_id: i32,
    ) -> Result<Vec<JobFileDto>, Error> {
        self.visible_job(user, job_id).await?;

        let files = JobFileRepository::new(self.db).list_for_job(job_id).await?;

        Ok(files.into_iter().map(JobFileDto::from).collect())
    }

    /// Records a file attached to a job by back office or an assigned pilot
    pub async fn add_file(
        &self,
        user: &CurrentUser,
        job_id: i32,
        file: CreateJobFileDto,
    ) -> Result<JobFileDto, Error> {
        if user.own_client_id().is_some() {
            return Err(AuthError::Forbidden.into());
        }
        self.visible_job(user, job_id).await?;

        let file_name = validate::required_text("file_name", &file.file_name)?;
        let url = validate::required_text("url", &file.url)?;
        if let Some(size) = file.size_bytes {
            if size < 0 {
                return Err(Error::validation("size_bytes must not be negative"));
            }
        }

        let created = JobFileRepository::new(self.db)
            .create(NewJobFile {
                job_id,
                file_name,
                url,
                content_type: file.content_type,
                size_bytes: file.size_bytes,
                provider: None,
                external_id: None,
                uploaded_by: Some(user.id),
            })
            .await?;

        Ok(created.into())
    }

    pub async fn delete_file(&self, job_id: i32, file_id: i32) -> Result<(), Error> {
        let file_repo = JobFileRepository::new(self.db);
        match file_repo.get(file_id).await? {
            Some(file) if file.job_id == job_id => {
                file_repo.delete(file_id).await?;

                Ok(())
            }
            _ => Err(Error::not_found("File", file_id)),
        }
    }

    pub async fn find(&self, job_id: i32) -> Result<JobModel, Error> {
        JobRepository::new(self.db)
            .get(job_id)
            .await?
            .ok_or_else(|| Error::not_found("Job", job_id))
    }
}

fn show_price(user: &CurrentUser) -> bool {
    user.own_pilot_id().is_none()
}
