use chrono::{NaiveDate, Utc};
use entity::sea_orm_active_enums::{ComplianceDocType, ComplianceStatus};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::{model::compliance::ComplianceListParams, server::data::text_or_none};

pub struct ComplianceDocRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

pub struct NewComplianceDoc {
    pub pilot_id: i32,
    pub doc_type: ComplianceDocType,
    pub file_url: Option<String>,
    pub expires_on: Option<NaiveDate>,
    pub status: ComplianceStatus,
    pub notes: Option<String>,
}

impl<'a, C: ConnectionTrait> ComplianceDocRepository<'a, C> {
    /// Creates a new instance of [`ComplianceDocRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        doc: NewComplianceDoc,
    ) -> Result<entity::compliance_doc::Model, DbErr> {
        entity::compliance_doc::ActiveModel {
            pilot_id: ActiveValue::Set(doc.pilot_id),
            doc_type: ActiveValue::Set(doc.doc_type),
            file_url: ActiveValue::Set(text_or_none(doc.file_url)),
            expires_on: ActiveValue::Set(doc.expires_on),
            status: ActiveValue::Set(doc.status),
            notes: ActiveValue::Set(text_or_none(doc.notes)),
            reviewed_by: ActiveValue::Set(None),
            reviewed_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(
        &self,
        doc_id: i32,
    ) -> Result<Option<entity::compliance_doc::Model>, DbErr> {
        entity::prelude::ComplianceDoc::find_by_id(doc_id)
            .one(self.db)
            .await
    }

    /// Lists documents newest first
    pub async fn list(
        &self,
        filter: &ComplianceListParams,
    ) -> Result<Vec<entity::compliance_doc::Model>, DbErr> {
        let mut query = entity::prelude::ComplianceDoc::find();

        if let Some(pilot_id) = filter.pilot_id {
            query = query.filter(entity::compliance_doc::Column::PilotId.eq(pilot_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(entity::compliance_doc::Column::Status.eq(status));
        }

        query
            .order_by_desc(entity::compliance_doc::Column::CreatedAt)
            .order_by_desc(entity::compliance_doc::Column::Id)
            .all(self.db)
            .await
    }

    /// Records a review decision along with the reviewing user and time
    pub async fn review(
        &self,
        doc: entity::compliance_doc::Model,
        reviewer_id: i32,
        status: ComplianceStatus,
        notes: Option<String>,
    ) -> Result<entity::compliance_doc::Model, DbErr> {
        let mut doc = doc.into_active_model();
        doc.status = ActiveValue::Set(status);
        if let Some(notes) = notes {
            doc.notes = ActiveValue::Set(text_or_none(Some(notes)));
        }
        doc.reviewed_by = ActiveValue::Set(Some(reviewer_id));
        doc.reviewed_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        doc.update(self.db).await
    }

    /// Documents expiring within `[from, to]`, soonest first
    pub async fn list_expiring(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<entity::compliance_doc::Model>, DbErr> {
        entity::prelude::ComplianceDoc::find()
            .filter(entity::compliance_doc::Column::ExpiresOn.gte(from))
            .filter(entity::compliance_doc::Column::ExpiresOn.lte(to))
            .order_by_asc(entity::compliance_doc::Column::ExpiresOn)
            .order_by_asc(entity::compliance_doc::Column::Id)
            .all(self.db)
            .await
    }

    /// Documents expiring on exactly one of `dates`
    pub async fn list_expiring_on(
        &self,
        dates: &[NaiveDate],
    ) -> Result<Vec<entity::compliance_doc::Model>, DbErr> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::ComplianceDoc::find()
            .filter(entity::compliance_doc::Column::ExpiresOn.is_in(dates.iter().copied()))
            .order_by_asc(entity::compliance_doc::Column::ExpiresOn)
            .order_by_asc(entity::compliance_doc::Column::Id)
            .all(self.db)
            .await
    }

    /// Returns `(total, approved)` document counts for a pilot
    pub async fn counts_for_pilot(&self, pilot_id: i32) -> Result<(u64, u64), DbErr> {
        let total = entity::prelude::ComplianceDoc::find()
            .filter(entity::compliance_doc::Column::PilotId.eq(pilot_id))
            .count(self.db)
            .await?;
        let approved = entity::prelude::ComplianceDoc::find()
            .filter(entity::compliance_doc::Column::PilotId.eq(pilot_id))
            .filter(entity::compliance_doc::Column::Status.eq(ComplianceStatus::Approved))
            .count(self.db)
            .await?;

        Ok((total, approved))
    }

    pub async fn count_pending(&self) -> Result<u64, DbErr> {
        entity::prelude::ComplianceDoc::find()
            .filter(entity::compliance_doc::Column::Status.eq(ComplianceStatus::Pending))
            .count(self.db)
            .await
    }

    pub async fn delete(&self, doc_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::ComplianceDoc::delete_by_id(doc_id)
            .exec(self.db)
            .await
    }
}
