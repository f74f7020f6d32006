use chrono::{Datelike, NaiveDate};
use entity::sea_orm_active_enums::JobStatus;
use sea_orm::DatabaseConnection;

use crate::{
    model::analytics::{DashboardDto, ForecastDto, ForecastMonthDto, JobStatusCountDto},
    server::{
        data::{
            client::ClientRepository, compliance::ComplianceDocRepository,
            invoice::InvoiceRepository, job::JobRepository, lead::LeadRepository,
            payment::PilotPaymentRepository, pilot::PilotRepository,
        },
        error::Error,
        util::time::{add_days, month_start, next_month_start},
    },
};

/// Window used for the dashboard's expiring documents count
pub const EXPIRING_SOON_DAYS: i64 = 30;

const JOB_STATUSES: [JobStatus; 5] = [
    JobStatus::Pending,
    JobStatus::Scheduled,
    JobStatus::InProgress,
    JobStatus::Completed,
    JobStatus::Cancelled,
];

pub struct AnalyticsService<'a> {
    db: &'a DatabaseConnection,
}

/// Ordinary least-squares fit of `y = intercept + slope * x`.
///
/// Returns `(intercept, slope)`. With fewer than two points the fit is flat at the only
/// value, or at zero when there are none.
pub fn least_squares(points: &[(f64, f64)]) -> (f64, f64) {
    match points {
        [] => return (0.0, 0.0),
        [(_, y)] => return (*y, 0.0),
        _ => {}
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let covariance: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let variance: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();

    if variance == 0.0 {
        return (mean_y, 0.0);
    }

    let slope = covariance / variance;

    (mean_y - slope * mean_x, slope)
}

/// Projects the months after `actual` from a trend fitted over it.
///
/// `actual` holds the revenue of January onwards, at most twelve months. Projected months
/// never go below zero.
pub fn project_year(year: i32, actual: &[i64]) -> ForecastDto {
    let actual = &actual[..actual.len().min(12)];

    let points: Vec<(f64, f64)> = actual
        .iter()
        .enumerate()
        .map(|(i, revenue)| ((i + 1) as f64, *revenue as f64))
        .collect();
    let (intercept, slope) = least_squares(&points);

    let mut months: Vec<ForecastMonthDto> = actual
        .iter()
        .enumerate()
        .map(|(i, revenue)| ForecastMonthDto {
            month: i as u32 + 1,
            revenue_cents: *revenue,
            projected: false,
        })
        .collect();

    for month in (actual.len() as u32 + 1)..=12 {
        let estimate = (intercept + slope * f64::from(month)).round().max(0.0);

        months.push(ForecastMonthDto {
            month,
            revenue_cents: estimate as i64,
            projected: true,
        });
    }

    let actual_total_cents = actual.iter().sum();
    let projected_total_cents = months.iter().map(|m| m.revenue_cents).sum();

    ForecastDto {
        year,
        months,
        slope,
        intercept,
        actual_total_cents,
        projected_total_cents,
    }
}

impl<'a> AnalyticsService<'a> {
    /// Creates a new instance of [`AnalyticsService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Headline counts and totals for the back office dashboard
    pub async fn dashboard(&self, today: NaiveDate) -> Result<DashboardDto, Error> {
        let job_repo = JobRepository::new(self.db);
        let invoice_repo = InvoiceRepository::new(self.db);
        let doc_repo = ComplianceDocRepository::new(self.db);

        let mut jobs_by_status = Vec::with_capacity(JOB_STATUSES.len());
        for status in JOB_STATUSES {
            jobs_by_status.push(JobStatusCountDto {
                status,
                count: job_repo.count_by_status(status).await?,
            });
        }

        let month = invoice_repo
            .paid_between(
                month_start(today.year(), today.month())?,
                next_month_start(today.year(), today.month())?,
            )
            .await?;
        let year = invoice_repo
            .paid_between(month_start(today.year(), 1)?, month_start(today.year() + 1, 1)?)
            .await?;

        let expiring = doc_repo
            .list_expiring(today, add_days(today, EXPIRING_SOON_DAYS)?)
            .await?;

        Ok(DashboardDto {
            client_count: ClientRepository::new(self.db).count().await?,
            active_pilot_count: PilotRepository::new(self.db).count_active().await?,
            open_lead_count: LeadRepository::new(self.db).count_open().await?,
            jobs_by_status,
            revenue_month_cents: month.iter().map(|(amount, _)| amount).sum(),
            revenue_year_cents: year.iter().map(|(amount, _)| amount).sum(),
            outstanding_cents: invoice_repo.outstanding_total().await?,
            pending_payouts_cents: PilotPaymentRepository::new(self.db).pending_total().await?,
            docs_pending_review: doc_repo.count_pending().await?,
            docs_expiring_soon: expiring.len() as u64,
        })
    }

    /// Monthly paid revenue for `year` with the rest of the year projected.
    ///
    /// Past years use all twelve months, the current year January through the current
    /// month, and future years have no actual months.
    pub async fn forecast(&self, today: NaiveDate, year: Option<i32>) -> Result<ForecastDto, Error> {
        let year = year.unwrap_or(today.year());
        let supported = NaiveDate::MIN.year()..NaiveDate::MAX.year();
        if !supported.contains(&year) {
            return Err(Error::validation(format!(
                "year must be between {} and {}",
                supported.start,
                supported.end - 1
            )));
        }
        let known_months = match year.cmp(&today.year()) {
            std::cmp::Ordering::Less => 12,
            std::cmp::Ordering::Equal => today.month() as usize,
            std::cmp::Ordering::Greater => 0,
        };

        let mut revenue = vec![0_i64; known_months];
        if known_months > 0 {
            let paid = InvoiceRepository::new(self.db)
                .paid_between(month_start(year, 1)?, month_start(year + 1, 1)?)
                .await?;

            for (amount, paid_at) in paid {
                if let Some(bucket) = revenue.get_mut(paid_at.month0() as usize) {
                    *bucket += amount;
                }
            }
        }

        Ok(project_year(year, &revenue))
    }
}
