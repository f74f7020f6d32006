use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

pub struct MessageRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MessageRepository<'a, C> {
    /// Creates a new instance of [`MessageRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        job_id: i32,
        sender_id: i32,
        body: String,
    ) -> Result<entity::message::Model, DbErr> {
        entity::message::ActiveModel {
            job_id: ActiveValue::Set(job_id),
            sender_id: ActiveValue::Set(sender_id),
            body: ActiveValue::Set(body),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Messages of a job with their senders, ascending by id, optionally only those newer
    /// than `after_id`
    pub async fn list_for_job(
        &self,
        job_id: i32,
        after_id: Option<i32>,
    ) -> Result<Vec<(entity::message::Model, Option<entity::user::Model>)>, DbErr> {
        let mut query = entity::prelude::Message::find()
            .filter(entity::message::Column::JobId.eq(job_id));

        if let Some(after_id) = after_id {
            query = query.filter(entity::message::Column::Id.gt(after_id));
        }

        query
            .find_also_related(entity::prelude::User)
            .order_by_asc(entity::message::Column::Id)
            .all(self.db)
            .await
    }
}
