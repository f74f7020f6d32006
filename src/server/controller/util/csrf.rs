use tower_sessions::Session;

use crate::server::{
    error::{auth::AuthError, Error},
    model::session::storage::SessionStorageCsrf,
};

/// Checks the callback's `state` against the one stored when the user was redirected.
///
/// The stored state is consumed either way. A missing state counts as a mismatch, which
/// happens when the callback is replayed or the session expired in between.
pub async fn validate_csrf(session: &Session, csrf_state: &str) -> Result<(), Error> {
    let stored_state = match SessionStorageCsrf::remove(session).await {
        Ok(state) => Some(state),
        Err(Error::AuthError(AuthError::CsrfMissingValue)) => None,
        Err(e) => return Err(e),
    };

    match stored_state {
        Some(state) if state == csrf_state => Ok(()),
        _ => Err(AuthError::CsrfValidationFailed.into()),
    }
}
