use sea_orm::DatabaseConnection;

use crate::{
    model::payment::{CreatePilotPaymentDto, PilotPaymentDto, UpdatePilotPaymentDto},
    server::{
        data::{job::JobRepository, payment::PilotPaymentRepository, pilot::PilotRepository},
        error::Error,
        model::access::CurrentUser,
        util::validate,
    },
};

pub struct PaymentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PaymentService<'a> {
    /// Creates a new instance of [`PaymentService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Payouts of a pilot, newest first
    pub async fn list_for_pilot(
        &self,
        user: &CurrentUser,
        pilot_id: i32,
    ) -> Result<Vec<PilotPaymentDto>, Error> {
        user.require_pilot_or_back_office(pilot_id)?;

        let payments = PilotPaymentRepository::new(self.db)
            .list_for_pilot(pilot_id)
            .await?;

        Ok(payments.into_iter().map(PilotPaymentDto::from).collect())
    }

    /// Records a pending payout owed to a pilot
    pub async fn create(
        &self,
        pilot_id: i32,
        payment: CreatePilotPaymentDto,
    ) -> Result<PilotPaymentDto, Error> {
        validate::positive_cents("amount_cents", payment.amount_cents)?;
        if PilotRepository::new(self.db).get(pilot_id).await?.is_none() {
            return Err(Error::not_found("Pilot", pilot_id));
        }
        if let Some(job_id) = payment.job_id {
            if JobRepository::new(self.db).get(job_id).await?.is_none() {
                return Err(Error::validation(format!("Job {} does not exist", job_id)));
            }
        }

        let created = PilotPaymentRepository::new(self.db)
            .create(pilot_id, payment)
            .await?;

        tracing::info!(
            payment_id = %created.id,
            pilot_id = %pilot_id,
            "Recorded pilot payout of {} cents",
            created.amount_cents
        );

        Ok(created.into())
    }

    /// Updates status and reference details, marking paid stamps `paid_at`
    pub async fn update(
        &self,
        payment_id: i32,
        changes: UpdatePilotPaymentDto,
    ) -> Result<PilotPaymentDto, Error> {
        PilotPaymentRepository::new(self.db)
            .update(payment_id, changes)
            .await?
            .map(PilotPaymentDto::from)
            .ok_or_else(|| Error::not_found("Payment", payment_id))
    }
}
