use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::UserRole;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    #[schema(value_type = String, example = "staff")]
    pub role: UserRole,
    pub pilot_id: Option<i32>,
    pub client_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct CreateUserDto {
    pub email: String,
    pub name: String,
    pub password: String,
    #[schema(value_type = String, example = "pilot")]
    pub role: UserRole,
    pub pilot_id: Option<i32>,
    pub client_id: Option<i32>,
}
