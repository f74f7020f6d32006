use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        user::{CreateUserDto, UserDto},
    },
    server::{
        controller::util::get_user::get_admin_user, error::Error, model::app::AppState,
        service::user::UserService,
    },
};

pub static USER_TAG: &str = "user";

/// Lists every user account (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = USER_TAG,
    responses(
        (status = 200, description = "All users", body = Vec<UserDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    get_admin_user(&state, &session).await?;

    let users = UserService::new(&state.db).list().await?;

    Ok((StatusCode::OK, Json(users)))
}

/// Creates a user account (admin only)
///
/// Pilot accounts must link an existing pilot and client accounts an existing client.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = USER_TAG,
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Invalid email, short password or missing link", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 409, description = "Email already in use", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_user(
    State(state): State<AppState>,
    session: Session,
    Json(user): Json<CreateUserDto>,
) -> Result<impl IntoResponse, Error> {
    get_admin_user(&state, &session).await?;

    let user = UserService::new(&state.db).create(user).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Deletes a user account (admin only, never the caller's own)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Attempt to delete own account", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let acting = get_admin_user(&state, &session).await?;

    UserService::new(&state.db).delete(&acting, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
