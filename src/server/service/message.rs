use entity::sea_orm_active_enums::AssignmentStatus;
use sea_orm::DatabaseConnection;

use crate::{
    model::message::{CreateMessageDto, MessageDto},
    server::{
        data::{
            assignment::AssignmentRepository, client::ClientRepository,
            message::MessageRepository,
        },
        error::Error,
        integration::{notify::Email, Integrations},
        model::{
            access::CurrentUser,
            db::{JobModel, MessageModel, UserModel},
        },
        service::job::JobService,
        util::validate::MAX_MESSAGE_LEN,
    },
};

pub struct MessageService<'a> {
    db: &'a DatabaseConnection,
    integrations: &'a Integrations,
}

fn message_dto(message: MessageModel, sender: Option<UserModel>) -> MessageDto {
    MessageDto {
        id: message.id,
        job_id: message.job_id,
        sender_id: message.sender_id,
        sender_name: sender.map(|u| u.name).unwrap_or_default(),
        body: message.body,
        created_at: message.created_at,
    }
}

impl<'a> MessageService<'a> {
    /// Creates a new instance of [`MessageService`]
    pub fn new(db: &'a DatabaseConnection, integrations: &'a Integrations) -> Self {
        Self { db, integrations }
    }

    /// Messages on a job visible to `user`, oldest first, after `after_id` when polling
    pub async fn list(
        &self,
        user: &CurrentUser,
        job_id: i32,
        after_id: Option<i32>,
    ) -> Result<Vec<MessageDto>, Error> {
        JobService::new(self.db, self.integrations)
            .visible_job(user, job_id)
            .await?;

        let messages = MessageRepository::new(self.db)
            .list_for_job(job_id, after_id)
            .await?;

        Ok(messages
            .into_iter()
            .map(|(message, sender)| message_dto(message, sender))
            .collect())
    }

    /// Posts a message on a job and emails the other parties without waiting for delivery
    pub async fn post(
        &self,
        user: &CurrentUser,
        job_id: i32,
        message: CreateMessageDto,
    ) -> Result<MessageDto, Error> {
        let job = JobService::new(self.db, self.integrations)
            .visible_job(user, job_id)
            .await?;

        let body = message.body.trim();
        if body.is_empty() {
            return Err(Error::validation("Message body is required"));
        }
        if body.chars().count() > MAX_MESSAGE_LEN {
            return Err(Error::validation(format!(
                "Message body must be at most {} characters",
                MAX_MESSAGE_LEN
            )));
        }

        let created = MessageRepository::new(self.db)
            .create(job_id, user.id, body.to_string())
            .await?;

        self.notify_other_parties(user, &job, &created.body).await;

        Ok(MessageDto {
            id: created.id,
            job_id: created.job_id,
            sender_id: created.sender_id,
            sender_name: user.name.clone(),
            body: created.body,
            created_at: created.created_at,
        })
    }

    /// Emails the other parties. The message is already stored, so a failed recipient
    /// lookup is logged and skips the emails instead of failing the post.
    async fn notify_other_parties(&self, sender: &CurrentUser, job: &JobModel, body: &str) {
        let recipients = match self.recipients(sender, job).await {
            Ok(recipients) => recipients,
            Err(e) => {
                tracing::warn!(job_id = %job.id, "Failed to resolve message recipients: {}", e);
                return;
            }
        };

        let notifier = self.integrations.notifier();
        for to in recipients {
            notifier.spawn_email(Email {
                to,
                subject: format!("New message on {}", job.title),
                body: format!("{} wrote:\n\n{}\n", sender.name, body),
            });
        }
    }

    /// Recipients are the job's client, its active pilots and the office, minus the
    /// sender's own side
    async fn recipients(
        &self,
        sender: &CurrentUser,
        job: &JobModel,
    ) -> Result<Vec<String>, Error> {
        let notifier = self.integrations.notifier();
        let mut recipients = Vec::new();

        if sender.own_client_id().is_none() {
            if let Some(email) = ClientRepository::new(self.db)
                .get(job.client_id)
                .await?
                .and_then(|c| c.email)
            {
                recipients.push(email);
            }
        }
        if sender.own_pilot_id().is_none() {
            let assignments = AssignmentRepository::new(self.db)
                .list_for_job(job.id)
                .await?;
            recipients.extend(
                assignments
                    .into_iter()
                    .filter(|(a, _)| a.status != AssignmentStatus::Declined)
                    .filter_map(|(_, pilot)| pilot.map(|p| p.email)),
            );
        }
        if !sender.is_back_office() {
            if let Some(admin) = notifier.admin_email() {
                recipients.push(admin.to_string());
            }
        }

        Ok(recipients)
    }
}
