//! Cron scheduler for the daily back-office sweeps.
//!
//! Jobs run in UTC: overdue invoices are marked early in the morning, compliance expiry
//! reminders go out at the start of the US business day.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{error::Error, integration::Integrations};

pub mod task;

/// Daily at 06:00 UTC
pub const OVERDUE_INVOICES_CRON: &str = "0 0 6 * * *";
/// Daily at 13:00 UTC
pub const EXPIRY_REMINDERS_CRON: &str = "0 0 13 * * *";

pub struct Scheduler {
    db: DatabaseConnection,
    integrations: Integrations,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`]
    pub async fn new(db: DatabaseConnection, integrations: Integrations) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;

        Ok(Self {
            db,
            integrations,
            sched,
        })
    }

    /// Registers every job and starts the scheduler.
    ///
    /// # Returns
    /// - `Ok(())` - All jobs registered and the scheduler running
    /// - `Err(Error)` - Invalid cron expression or the scheduler failed to start
    pub async fn start(mut self) -> Result<(), Error> {
        self.schedule_job(
            OVERDUE_INVOICES_CRON,
            "overdue invoice",
            task::mark_overdue_invoices,
        )
        .await?;

        self.schedule_job(
            EXPIRY_REMINDERS_CRON,
            "compliance expiry reminder",
            task::send_expiry_reminders,
        )
        .await?;

        self.sched.start().await?;

        Ok(())
    }

    /// Registers `function` to run on `cron`, logging how many records it handled.
    ///
    /// A failed run is logged and retried on the next tick.
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(DatabaseConnection, Integrations) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let db = self.db.clone();
        let integrations = self.integrations.clone();
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let db = db.clone();
                let integrations = integrations.clone();
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(db, integrations).await {
                        Ok(count) => tracing::info!("Handled {} {}(s)", count, name),
                        Err(e) => tracing::error!("Error running {} job: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
