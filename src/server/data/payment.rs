use chrono::Utc;
use entity::sea_orm_active_enums::PilotPaymentStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    model::payment::{CreatePilotPaymentDto, UpdatePilotPaymentDto},
    server::data::{patch_text, text_or_none},
};

pub struct PilotPaymentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PilotPaymentRepository<'a, C> {
    /// Creates a new instance of [`PilotPaymentRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Records a pending payout owed to a pilot
    pub async fn create(
        &self,
        pilot_id: i32,
        payment: CreatePilotPaymentDto,
    ) -> Result<entity::pilot_payment::Model, DbErr> {
        entity::pilot_payment::ActiveModel {
            pilot_id: ActiveValue::Set(pilot_id),
            job_id: ActiveValue::Set(payment.job_id),
            amount_cents: ActiveValue::Set(payment.amount_cents),
            status: ActiveValue::Set(PilotPaymentStatus::Pending),
            method: ActiveValue::Set(text_or_none(payment.method)),
            reference: ActiveValue::Set(text_or_none(payment.reference)),
            paid_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(
        &self,
        payment_id: i32,
    ) -> Result<Option<entity::pilot_payment::Model>, DbErr> {
        entity::prelude::PilotPayment::find_by_id(payment_id)
            .one(self.db)
            .await
    }

    /// Payments for a pilot, newest first
    pub async fn list_for_pilot(
        &self,
        pilot_id: i32,
    ) -> Result<Vec<entity::pilot_payment::Model>, DbErr> {
        entity::prelude::PilotPayment::find()
            .filter(entity::pilot_payment::Column::PilotId.eq(pilot_id))
            .order_by_desc(entity::pilot_payment::Column::CreatedAt)
            .order_by_desc(entity::pilot_payment::Column::Id)
            .all(self.db)
            .await
    }

    /// Applies a partial update, returning `None` if the payment does not exist.
    ///
    /// Moving to paid stamps `paid_at`, moving back to pending clears it.
    pub async fn update(
        &self,
        payment_id: i32,
        changes: UpdatePilotPaymentDto,
    ) -> Result<Option<entity::pilot_payment::Model>, DbErr> {
        let Some(payment) = self.get(payment_id).await? else {
            return Ok(None);
        };
        let previous_status = payment.status;

        let mut payment = payment.into_active_model();
        if let Some(status) = changes.status {
            payment.status = ActiveValue::Set(status);

            match status {
                PilotPaymentStatus::Paid if previous_status != PilotPaymentStatus::Paid => {
                    payment.paid_at = ActiveValue::Set(Some(Utc::now().naive_utc()));
                }
                PilotPaymentStatus::Pending => payment.paid_at = ActiveValue::Set(None),
                PilotPaymentStatus::Paid => {}
            }
        }
        patch_text(&mut payment.method, changes.method);
        patch_text(&mut payment.reference, changes.reference);

        Ok(Some(payment.update(self.db).await?))
    }

    /// Total of all payouts not yet paid
    pub async fn pending_total(&self) -> Result<i64, DbErr> {
        let amounts = entity::prelude::PilotPayment::find()
            .select_only()
            .column(entity::pilot_payment::Column::AmountCents)
            .filter(entity::pilot_payment::Column::Status.eq(PilotPaymentStatus::Pending))
            .into_tuple::<i64>()
            .all(self.db)
            .await?;

        Ok(amounts.into_iter().sum())
    }
}
