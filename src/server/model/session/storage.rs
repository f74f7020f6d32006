//! CSRF state for cloud storage OAuth authorization.
//!
//! The state token is generated when the user is redirected to the provider and must be
//! presented again on the callback. It is removed on first use so a callback URL cannot be
//! replayed.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::{auth::AuthError, Error};

pub const SESSION_STORAGE_CSRF_KEY: &str = "hangar:storage:csrf";

#[derive(Default, Deserialize, Serialize, Debug)]
pub struct SessionStorageCsrf(pub String);

impl SessionStorageCsrf {
    /// Inserts the CSRF state token into the session, replacing any previous one.
    pub async fn insert(session: &Session, state: &str) -> Result<(), Error> {
        session
            .insert(SESSION_STORAGE_CSRF_KEY, SessionStorageCsrf(state.to_string()))
            .await?;

        Ok(())
    }

    /// Removes and returns the CSRF state token.
    ///
    /// # Returns
    /// - `Ok(String)` - Token found and removed
    /// - `Err(Error::AuthError(AuthError::CsrfMissingValue))` - No token in session
    pub async fn remove(session: &Session) -> Result<String, Error> {
        match session
            .remove::<SessionStorageCsrf>(SESSION_STORAGE_CSRF_KEY)
            .await?
        {
            Some(SessionStorageCsrf(state)) => Ok(state),
            None => Err(AuthError::CsrfMissingValue.into()),
        }
    }
}
