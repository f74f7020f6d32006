use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        user::{LoginDto, UserDto},
    },
    server::{
        controller::util::get_user::get_user_from_session,
        error::Error,
        model::{app::AppState, session::user::SessionUserId},
        service::auth::AuthService,
    },
};

pub static AUTH_TAG: &str = "auth";

/// Logs in with email and password
///
/// Stores the user id in a fresh session on success.
///
/// # Responses
/// - 200 (Success): Logged in, returns the user
/// - 401 (Unauthorized): Unknown email or wrong password
/// - 500 (Internal Server Error): A database or session store error occurred
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = UserDto),
        (status = 401, description = "Invalid email or password", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<LoginDto>,
) -> Result<impl IntoResponse, Error> {
    let user = AuthService::new(&state.db)
        .login(&credentials.email, &credentials.password)
        .await?;

    SessionUserId::insert(&session, user.id).await?;

    Ok((StatusCode::OK, Json(UserDto::from(user))))
}

/// Logs the user out by clearing their session
///
/// # Responses
/// - 204 (No Content): Logged out, or there was no one logged in
/// - 500 (Internal Server Error): There was an issue clearing the session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 204, description = "Logged out"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, Error> {
    // Clearing a session that was never stored fails in the store
    if SessionUserId::get(&session).await?.is_some() {
        session.clear().await;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the logged-in user
///
/// # Responses
/// - 200 (Success): The user in session
/// - 401 (Unauthorized): Nobody is logged in
/// - 500 (Internal Server Error): A database or session store error occurred
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged-in user", body = UserDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    Ok((StatusCode::OK, Json(UserDto::from(user))))
}
