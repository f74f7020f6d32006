use tower_sessions::Session;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, Error},
    model::{access::CurrentUser, app::AppState, session::user::SessionUserId},
};

/// Retrieves the logged-in user from the session and then from the database
///
/// # Returns
/// - `Ok(CurrentUser)`: User found
/// - `Err(Error::AuthError(AuthError::UserNotInSession))`: No user id in session
/// - `Err(Error::AuthError(AuthError::UserNotInDatabase))`: User id in session but the user
///   was deleted, the session is cleared
/// - `Err(Error)`: Session or database failure
pub async fn get_user_from_session(
    state: &AppState,
    session: &Session,
) -> Result<CurrentUser, Error> {
    let Some(user_id) = SessionUserId::get(session).await? else {
        return Err(AuthError::UserNotInSession.into());
    };

    let Some(user) = UserRepository::new(&state.db).get(user_id).await? else {
        session.clear().await;

        tracing::debug!(
            "Session cleared for user ID {} with active session but was not found in database",
            user_id
        );

        return Err(AuthError::UserNotInDatabase(user_id).into());
    };

    Ok(user.into())
}

/// Logged-in user who must be admin or staff
pub async fn get_back_office_user(
    state: &AppState,
    session: &Session,
) -> Result<CurrentUser, Error> {
    let user = get_user_from_session(state, session).await?;
    user.require_back_office()?;

    Ok(user)
}

/// Logged-in user who must be an admin
pub async fn get_admin_user(state: &AppState, session: &Session) -> Result<CurrentUser, Error> {
    let user = get_user_from_session(state, session).await?;
    user.require_admin()?;

    Ok(user)
}
