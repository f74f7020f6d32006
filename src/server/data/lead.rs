use chrono::Utc;
use entity::sea_orm_active_enums::LeadStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::{
    model::lead::{CreateLeadDto, UpdateLeadDto},
    server::data::{patch_text, text_or_none},
};

pub struct LeadRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LeadRepository<'a, C> {
    /// Creates a new instance of [`LeadRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, lead: CreateLeadDto) -> Result<entity::lead::Model, DbErr> {
        let now = Utc::now().naive_utc();

        entity::lead::ActiveModel {
            name: ActiveValue::Set(lead.name.trim().to_string()),
            company: ActiveValue::Set(text_or_none(lead.company)),
            email: ActiveValue::Set(text_or_none(lead.email).map(|e| e.to_lowercase())),
            phone: ActiveValue::Set(text_or_none(lead.phone)),
            source: ActiveValue::Set(text_or_none(lead.source)),
            status: ActiveValue::Set(lead.status.unwrap_or(LeadStatus::New)),
            estimated_value_cents: ActiveValue::Set(lead.estimated_value_cents.unwrap_or(0)),
            notes: ActiveValue::Set(text_or_none(lead.notes)),
            converted_client_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(&self, lead_id: i32) -> Result<Option<entity::lead::Model>, DbErr> {
        entity::prelude::Lead::find_by_id(lead_id).one(self.db).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<entity::lead::Model>, DbErr> {
        entity::prelude::Lead::find()
            .filter(entity::lead::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await
    }

    /// Finds a lead without an email address by case-insensitive name and company
    pub async fn find_by_name_without_email(
        &self,
        name: &str,
        company: Option<&str>,
    ) -> Result<Option<entity::lead::Model>, DbErr> {
        let key = |name: &str, company: Option<&str>| {
            (
                name.trim().to_lowercase(),
                company
                    .map(|c| c.trim().to_lowercase())
                    .filter(|c| !c.is_empty()),
            )
        };
        let wanted = key(name, company);

        let leads = entity::prelude::Lead::find()
            .filter(entity::lead::Column::Email.is_null())
            .order_by_asc(entity::lead::Column::Id)
            .all(self.db)
            .await?;

        Ok(leads
            .into_iter()
            .find(|lead| key(&lead.name, lead.company.as_deref()) == wanted))
    }

    /// Lists leads, newest first
    pub async fn list(
        &self,
        status: Option<LeadStatus>,
    ) -> Result<Vec<entity::lead::Model>, DbErr> {
        let mut query = entity::prelude::Lead::find();

        if let Some(status) = status {
            query = query.filter(entity::lead::Column::Status.eq(status));
        }

        query
            .order_by_desc(entity::lead::Column::CreatedAt)
            .order_by_desc(entity::lead::Column::Id)
            .all(self.db)
            .await
    }

    /// Applies a partial update, returning `None` if the lead does not exist
    pub async fn update(
        &self,
        lead_id: i32,
        changes: UpdateLeadDto,
    ) -> Result<Option<entity::lead::Model>, DbErr> {
        let Some(lead) = self.get(lead_id).await? else {
            return Ok(None);
        };

        let mut lead = lead.into_active_model();
        if let Some(name) = changes.name {
            lead.name = ActiveValue::Set(name.trim().to_string());
        }
        patch_text(&mut lead.company, changes.company);
        patch_text(&mut lead.email, changes.email.map(|e| e.to_lowercase()));
        patch_text(&mut lead.phone, changes.phone);
        patch_text(&mut lead.source, changes.source);
        if let Some(status) = changes.status {
            lead.status = ActiveValue::Set(status);
        }
        if let Some(value) = changes.estimated_value_cents {
            lead.estimated_value_cents = ActiveValue::Set(value);
        }
        patch_text(&mut lead.notes, changes.notes);
        lead.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(lead.update(self.db).await?))
    }

    /// Marks a lead won and links it to the client it became
    pub async fn mark_converted(
        &self,
        lead: entity::lead::Model,
        client_id: i32,
    ) -> Result<entity::lead::Model, DbErr> {
        let mut lead = lead.into_active_model();
        lead.status = ActiveValue::Set(LeadStatus::Won);
        lead.converted_client_id = ActiveValue::Set(Some(client_id));
        lead.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        lead.update(self.db).await
    }

    /// Leads that are neither won nor lost
    pub async fn count_open(&self) -> Result<u64, DbErr> {
        entity::prelude::Lead::find()
            .filter(entity::lead::Column::Status.is_not_in([LeadStatus::Won, LeadStatus::Lost]))
            .count(self.db)
            .await
    }

    pub async fn delete(&self, lead_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Lead::delete_by_id(lead_id)
            .exec(self.db)
            .await
    }
}
