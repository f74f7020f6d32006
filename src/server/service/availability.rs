use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

use crate::{
    model::{availability::AvailabilityDto, pilot::PilotDto},
    server::{
        data::{availability::AvailabilityRepository, pilot::PilotRepository},
        error::Error,
        service::pilot::PilotService,
    },
};

/// Longest range a single availability query may cover
const MAX_RANGE_DAYS: i64 = 366;

pub struct AvailabilityService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AvailabilityService<'a> {
    /// Creates a new instance of [`AvailabilityService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sets whether a pilot is available on `date`; repeating a value changes nothing
    pub async fn set(
        &self,
        pilot_id: i32,
        date: NaiveDate,
        available: bool,
    ) -> Result<AvailabilityDto, Error> {
        PilotService::new(self.db).find(pilot_id).await?;

        let entry = AvailabilityRepository::new(self.db)
            .upsert(pilot_id, date, available)
            .await?;

        Ok(entry.into())
    }

    /// Days between `from` and `to` inclusive for which the pilot has an entry
    pub async fn range(
        &self,
        pilot_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AvailabilityDto>, Error> {
        if from > to {
            return Err(Error::validation("from must not be after to"));
        }
        if (to - from).num_days() > MAX_RANGE_DAYS {
            return Err(Error::validation(format!(
                "Range may span at most {} days",
                MAX_RANGE_DAYS
            )));
        }
        PilotService::new(self.db).find(pilot_id).await?;

        let entries = AvailabilityRepository::new(self.db)
            .list_range(pilot_id, from, to)
            .await?;

        Ok(entries.into_iter().map(AvailabilityDto::from).collect())
    }

    /// Active pilots explicitly marked available on `date`
    pub async fn available_on(&self, date: NaiveDate) -> Result<Vec<PilotDto>, Error> {
        let pilots = PilotRepository::new(self.db).list_available_on(date).await?;

        Ok(pilots.into_iter().map(PilotDto::from).collect())
    }
}
