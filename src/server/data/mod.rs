//! Repositories over the SeaORM entities.
//!
//! Repositories are generic over [`sea_orm::ConnectionTrait`] so the same code runs against
//! a pooled connection or inside a transaction. They perform no authorization and no
//! validation beyond what the schema enforces.

pub mod assignment;
pub mod availability;
pub mod client;
pub mod compliance;
pub mod contract;
pub mod invoice;
pub mod job;
pub mod job_file;
pub mod lead;
pub mod message;
pub mod payment;
pub mod pilot;
pub mod storage;
pub mod user;
pub mod w9;

/// Normalizes an optional text field on create: trimmed, with blanks stored as NULL
pub fn text_or_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Applies a PATCH value to an optional text column.
///
/// `None` leaves the column untouched, an empty string clears it.
pub fn patch_text(
    column: &mut sea_orm::ActiveValue<Option<String>>,
    value: Option<String>,
) {
    if let Some(value) = value {
        *column = sea_orm::ActiveValue::Set(text_or_none(Some(value)));
    }
}

/// Pattern matching `search` anywhere in a lowercased column
pub fn contains_pattern(search: &str) -> String {
    format!("%{}%", search.trim().to_lowercase())
}
