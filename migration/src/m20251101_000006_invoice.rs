use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000001_client::Client, m20251101_000004_job::Job};

static IDX_INVOICE_CLIENT_ID: &str = "idx-invoice-client_id";
static FK_INVOICE_CLIENT_ID: &str = "fk-invoice-client_id";
static FK_INVOICE_JOB_ID: &str = "fk-invoice-job_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invoice::Table)
                    .if_not_exists()
                    .col(pk_auto(Invoice::Id))
                    .col(string_uniq(Invoice::InvoiceNumber))
                    .col(integer(Invoice::ClientId))
                    .col(integer_null(Invoice::JobId))
                    .col(big_integer(Invoice::AmountCents))
                    .col(string(Invoice::Status).default("draft"))
                    .col(date(Invoice::IssueDate))
                    .col(date(Invoice::DueDate))
                    .col(timestamp_null(Invoice::PaidAt))
                    .col(string_null(Invoice::StripeSessionId))
                    .col(string_null(Invoice::StripePaymentIntent))
                    .col(text_null(Invoice::Notes))
                    .col(timestamp(Invoice::CreatedAt))
                    .col(timestamp(Invoice::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_INVOICE_CLIENT_ID)
                            .from(Invoice::Table, Invoice::ClientId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_INVOICE_JOB_ID)
                            .from(Invoice::Table, Invoice::JobId)
                            .to(Job::Table, Job::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_INVOICE_CLIENT_ID)
                    .table(Invoice::Table)
                    .col(Invoice::ClientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_INVOICE_CLIENT_ID)
                    .table(Invoice::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Invoice::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Invoice {
    Table,
    Id,
    InvoiceNumber,
    ClientId,
    JobId,
    AmountCents,
    Status,
    IssueDate,
    DueDate,
    PaidAt,
    StripeSessionId,
    StripePaymentIntent,
    Notes,
    CreatedAt,
    UpdatedAt,
}
