use chrono::{NaiveDate, Utc};
use entity::sea_orm_active_enums::PilotStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    model::pilot::{CreatePilotDto, UpdatePilotDto},
    server::data::{patch_text, text_or_none},
};

/// Hourly rate given to pilots created without one
pub const DEFAULT_HOURLY_RATE_CENTS: i64 = 0;

pub struct PilotRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PilotRepository<'a, C> {
    /// Creates a new instance of [`PilotRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, pilot: CreatePilotDto) -> Result<entity::pilot::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let pilot = entity::pilot::ActiveModel {
            name: ActiveValue::Set(pilot.name.trim().to_string()),
            email: ActiveValue::Set(pilot.email.trim().to_lowercase()),
            phone: ActiveValue::Set(text_or_none(pilot.phone)),
            status: ActiveValue::Set(pilot.status.unwrap_or(PilotStatus::Active)),
            faa_cert_number: ActiveValue::Set(text_or_none(pilot.faa_cert_number)),
            faa_cert_expiry: ActiveValue::Set(pilot.faa_cert_expiry),
            insurance_expiry: ActiveValue::Set(pilot.insurance_expiry),
            hourly_rate_cents: ActiveValue::Set(
                pilot.hourly_rate_cents.unwrap_or(DEFAULT_HOURLY_RATE_CENTS),
            ),
            home_base: ActiveValue::Set(text_or_none(pilot.home_base)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        pilot.insert(self.db).await
    }

    pub async fn get(&self, pilot_id: i32) -> Result<Option<entity::pilot::Model>, DbErr> {
        entity::prelude::Pilot::find_by_id(pilot_id).one(self.db).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<entity::pilot::Model>, DbErr> {
        entity::prelude::Pilot::find()
            .filter(entity::pilot::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await
    }

    pub async fn list(
        &self,
        status: Option<PilotStatus>,
    ) -> Result<Vec<entity::pilot::Model>, DbErr> {
        let mut query = entity::prelude::Pilot::find();

        if let Some(status) = status {
            query = query.filter(entity::pilot::Column::Status.eq(status));
        }

        query
            .order_by_asc(entity::pilot::Column::Name)
            .all(self.db)
            .await
    }

    pub async fn get_many(&self, pilot_ids: &[i32]) -> Result<Vec<entity::pilot::Model>, DbErr> {
        entity::prelude::Pilot::find()
            .filter(entity::pilot::Column::Id.is_in(pilot_ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// Applies a partial update, returning `None` if the pilot does not exist
    pub async fn update(
        &self,
        pilot_id: i32,
        changes: UpdatePilotDto,
    ) -> Result<Option<entity::pilot::Model>, DbErr> {
        let Some(pilot) = self.get(pilot_id).await? else {
            return Ok(None);
        };

        let mut pilot = pilot.into_active_model();
        if let Some(name) = changes.name {
            pilot.name = ActiveValue::Set(name.trim().to_string());
        }
        if let Some(email) = changes.email {
            pilot.email = ActiveValue::Set(email.trim().to_lowercase());
        }
        patch_text(&mut pilot.phone, changes.phone);
        if let Some(status) = changes.status {
            pilot.status = ActiveValue::Set(status);
        }
        patch_text(&mut pilot.faa_cert_number, changes.faa_cert_number);
        if let Some(expiry) = changes.faa_cert_expiry {
            pilot.faa_cert_expiry = ActiveValue::Set(Some(expiry));
        }
        if let Some(expiry) = changes.insurance_expiry {
            pilot.insurance_expiry = ActiveValue::Set(Some(expiry));
        }
        if let Some(rate) = changes.hourly_rate_cents {
            pilot.hourly_rate_cents = ActiveValue::Set(rate);
        }
        patch_text(&mut pilot.home_base, changes.home_base);
        pilot.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(pilot.update(self.db).await?))
    }

    /// Deletes a pilot along with its assignments, availability, documents and payments
    ///
    /// Returns OK regardless of pilot existing, to confirm the deletion result
    /// check the [`DeleteResult::rows_affected`] field.
    pub async fn delete(&self, pilot_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Pilot::delete_by_id(pilot_id)
            .exec(self.db)
            .await
    }

    pub async fn count_active(&self) -> Result<u64, DbErr> {
        entity::prelude::Pilot::find()
            .filter(entity::pilot::Column::Status.eq(PilotStatus::Active))
            .count(self.db)
            .await
    }

    /// Active pilots with an explicit `available = true` entry for `date`
    pub async fn list_available_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<entity::pilot::Model>, DbErr> {
        let pilot_ids = entity::prelude::PilotAvailability::find()
            .select_only()
            .column(entity::pilot_availability::Column::PilotId)
            .filter(entity::pilot_availability::Column::Date.eq(date))
            .filter(entity::pilot_availability::Column::Available.eq(true))
            .into_tuple::<i32>()
            .all(self.db)
            .await?;

        entity::prelude::Pilot::find()
            .filter(entity::pilot::Column::Id.is_in(pilot_ids))
            .filter(entity::pilot::Column::Status.eq(PilotStatus::Active))
            .order_by_asc(entity::pilot::Column::Name)
            .all(self.db)
            .await
    }
}
