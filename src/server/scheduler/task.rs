use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    error::Error,
    integration::Integrations,
    service::{compliance::ComplianceService, invoice::InvoiceService},
};

/// Marks sent invoices due before today overdue, returning how many changed
pub async fn mark_overdue_invoices(
    db: DatabaseConnection,
    integrations: Integrations,
) -> Result<usize, Error> {
    let today = Utc::now().date_naive();

    InvoiceService::new(&db, &integrations)
        .mark_overdue(today)
        .await
}

/// Reminds pilots and the admin about compliance documents nearing expiry
pub async fn send_expiry_reminders(
    db: DatabaseConnection,
    integrations: Integrations,
) -> Result<usize, Error> {
    let today = Utc::now().date_naive();

    ComplianceService::new(&db, &integrations)
        .send_expiry_reminders(today)
        .await
}
