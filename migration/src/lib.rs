pub use sea_orm_migration::prelude::*;

mod m20251101_000001_client;
mod m20251101_000002_pilot;
mod m20251101_000003_hangar_user;
mod m20251101_000004_job;
mod m20251101_000005_job_assignment;
mod m20251101_000006_invoice;
mod m20251101_000007_contract;
mod m20251101_000008_lead;
mod m20251101_000009_compliance_doc;
mod m20251101_000010_job_file;
mod m20251101_000011_message;
mod m20251101_000012_pilot_availability;
mod m20251101_000013_w9_form;
mod m20251101_000014_pilot_payment;
mod m20251101_000015_storage_connection;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_client::Migration),
            Box::new(m20251101_000002_pilot::Migration),
            Box::new(m20251101_000003_hangar_user::Migration),
            Box::new(m20251101_000004_job::Migration),
            Box::new(m20251101_000005_job_assignment::Migration),
            Box::new(m20251101_000006_invoice::Migration),
            Box::new(m20251101_000007_contract::Migration),
            Box::new(m20251101_000008_lead::Migration),
            Box::new(m20251101_000009_compliance_doc::Migration),
            Box::new(m20251101_000010_job_file::Migration),
            Box::new(m20251101_000011_message::Migration),
            Box::new(m20251101_000012_pilot_availability::Migration),
            Box::new(m20251101_000013_w9_form::Migration),
            Box::new(m20251101_000014_pilot_payment::Migration),
            Box::new(m20251101_000015_storage_connection::Migration),
        ]
    }
}
