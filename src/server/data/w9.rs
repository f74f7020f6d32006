use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};

pub struct W9Repository<'a, C: ConnectionTrait> {
    db: &'a C,
}

/// A W-9 submission with the TIN already reduced to its last four digits
pub struct NewW9 {
    pub legal_name: String,
    pub business_name: Option<String>,
    pub tax_classification: String,
    pub tin_last4: String,
    pub address: String,
}

impl<'a, C: ConnectionTrait> W9Repository<'a, C> {
    /// Creates a new instance of [`W9Repository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get_for_pilot(
        &self,
        pilot_id: i32,
    ) -> Result<Option<entity::w9_form::Model>, DbErr> {
        entity::prelude::W9Form::find()
            .filter(entity::w9_form::Column::PilotId.eq(pilot_id))
            .one(self.db)
            .await
    }

    /// Stores the pilot's W-9, replacing any previous submission
    pub async fn upsert(
        &self,
        pilot_id: i32,
        form: NewW9,
    ) -> Result<entity::w9_form::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let existing = self.get_for_pilot(pilot_id).await?;
        let is_new = existing.is_none();

        let mut active = match existing {
            Some(existing) => existing.into_active_model(),
            None => entity::w9_form::ActiveModel {
                pilot_id: ActiveValue::Set(pilot_id),
                created_at: ActiveValue::Set(now),
                ..Default::default()
            },
        };
        active.legal_name = ActiveValue::Set(form.legal_name);
        active.business_name = ActiveValue::Set(form.business_name);
        active.tax_classification = ActiveValue::Set(form.tax_classification);
        active.tin_last4 = ActiveValue::Set(form.tin_last4);
        active.address = ActiveValue::Set(form.address);
        active.signed_at = ActiveValue::Set(now);
        active.updated_at = ActiveValue::Set(now);

        if is_new {
            active.insert(self.db).await
        } else {
            active.update(self.db).await
        }
    }
}
