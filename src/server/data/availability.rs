use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

pub struct AvailabilityRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AvailabilityRepository<'a, C> {
    /// Creates a new instance of [`AvailabilityRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Sets a pilot's availability for one day, creating or replacing the entry
    pub async fn upsert(
        &self,
        pilot_id: i32,
        date: NaiveDate,
        available: bool,
    ) -> Result<entity::pilot_availability::Model, DbErr> {
        let existing = entity::prelude::PilotAvailability::find()
            .filter(entity::pilot_availability::Column::PilotId.eq(pilot_id))
            .filter(entity::pilot_availability::Column::Date.eq(date))
            .one(self.db)
            .await?;

        match existing {
            Some(entry) if entry.available == available => Ok(entry),
            Some(entry) => {
                let mut entry = entry.into_active_model();
                entry.available = ActiveValue::Set(available);
                entry.updated_at = ActiveValue::Set(Utc::now().naive_utc());

                entry.update(self.db).await
            }
            None => {
                entity::pilot_availability::ActiveModel {
                    pilot_id: ActiveValue::Set(pilot_id),
                    date: ActiveValue::Set(date),
                    available: ActiveValue::Set(available),
                    updated_at: ActiveValue::Set(Utc::now().naive_utc()),
                    ..Default::default()
                }
                .insert(self.db)
                .await
            }
        }
    }

    /// Entries for a pilot between `from` and `to` inclusive, ordered by date
    pub async fn list_range(
        &self,
        pilot_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<entity::pilot_availability::Model>, DbErr> {
        entity::prelude::PilotAvailability::find()
            .filter(entity::pilot_availability::Column::PilotId.eq(pilot_id))
            .filter(entity::pilot_availability::Column::Date.between(from, to))
            .order_by_asc(entity::pilot_availability::Column::Date)
            .all(self.db)
            .await
    }
}
