use chrono::Utc;
use entity::sea_orm_active_enums::StorageProvider;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, QueryFilter, QueryOrder,
};

pub struct JobFileRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

/// Metadata of a file attached to a job
pub struct NewJobFile {
    pub job_id: i32,
    pub file_name: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub provider: Option<StorageProvider>,
    pub external_id: Option<String>,
    pub uploaded_by: Option<i32>,
}

impl<'a, C: ConnectionTrait> JobFileRepository<'a, C> {
    /// Creates a new instance of [`JobFileRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, file: NewJobFile) -> Result<entity::job_file::Model, DbErr> {
        entity::job_file::ActiveModel {
            job_id: ActiveValue::Set(file.job_id),
            file_name: ActiveValue::Set(file.file_name),
            url: ActiveValue::Set(file.url),
            content_type: ActiveValue::Set(file.content_type),
            size_bytes: ActiveValue::Set(file.size_bytes),
            provider: ActiveValue::Set(file.provider),
            external_id: ActiveValue::Set(file.external_id),
            uploaded_by: ActiveValue::Set(file.uploaded_by),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(&self, file_id: i32) -> Result<Option<entity::job_file::Model>, DbErr> {
        entity::prelude::JobFile::find_by_id(file_id)
            .one(self.db)
            .await
    }

    pub async fn list_for_job(&self, job_id: i32) -> Result<Vec<entity::job_file::Model>, DbErr> {
        entity::prelude::JobFile::find()
            .filter(entity::job_file::Column::JobId.eq(job_id))
            .order_by_asc(entity::job_file::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn delete(&self, file_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::JobFile::delete_by_id(file_id)
            .exec(self.db)
            .await
    }
}
