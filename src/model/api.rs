use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// Outcome of a CSV import
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ImportSummaryDto {
    /// Rows that created a new record
    pub created: u32,
    /// Rows that updated an existing record
    pub updated: u32,
    /// Rows ignored because they carried no usable data
    pub skipped: u32,
    /// Rows that failed, with the 1-based line number of the CSV record
    pub errors: Vec<ImportRowErrorDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportRowErrorDto {
    pub line: u64,
    pub message: String,
}
