use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub id: i32,
    pub job_id: i32,
    pub sender_id: i32,
    pub sender_name: String,
    pub body: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct CreateMessageDto {
    pub body: String,
}

#[derive(Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MessageListParams {
    /// Only return messages with an id greater than this one
    pub after_id: Option<i32>,
}
