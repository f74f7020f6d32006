use chrono::{NaiveDate, NaiveDateTime};
use entity::sea_orm_active_enums::{AssignmentStatus, JobStatus, StorageProvider};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct JobDto {
    pub id: i32,
    pub client_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    #[schema(value_type = String, example = "scheduled")]
    pub status: JobStatus,
    /// Client price, withheld from pilots
    pub price_cents: Option<i64>,
    pub tracking_token: String,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub assignments: Vec<AssignmentDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignmentDto {
    pub pilot_id: i32,
    pub pilot_name: String,
    #[schema(value_type = String, example = "assigned")]
    pub status: AssignmentStatus,
    pub pay_cents: i64,
    pub assigned_at: NaiveDateTime,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct CreateJobDto {
    pub client_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub status: Option<JobStatus>,
    pub price_cents: Option<i64>,
}

#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct UpdateJobDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub status: Option<JobStatus>,
    pub price_cents: Option<i64>,
}

#[derive(Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JobListParams {
    #[param(value_type = Option<String>)]
    pub status: Option<JobStatus>,
    pub client_id: Option<i32>,
    pub pilot_id: Option<i32>,
    /// Earliest scheduled date, inclusive
    pub from: Option<NaiveDate>,
    /// Latest scheduled date, inclusive
    pub to: Option<NaiveDate>,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct CreateAssignmentDto {
    pub pilot_id: i32,
    pub pay_cents: Option<i64>,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct UpdateAssignmentDto {
    #[schema(value_type = String)]
    pub status: AssignmentStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct JobFileDto {
    pub id: i32,
    pub job_id: i32,
    pub file_name: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    #[schema(value_type = Option<String>)]
    pub provider: Option<StorageProvider>,
    pub uploaded_by: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct CreateJobFileDto {
    pub file_name: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
}

/// Public view of a job reached through its tracking token
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TrackingDto {
    pub title: String,
    #[schema(value_type = String)]
    pub status: JobStatus,
    pub scheduled_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub client_name: String,
    pub completed_at: Option<NaiveDateTime>,
}
