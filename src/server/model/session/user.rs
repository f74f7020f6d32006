//! Logged-in user id stored in the session after a successful login.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::Error;

pub const SESSION_USER_ID_KEY: &str = "hangar:user:id";

#[derive(Default, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUserId(pub i32);

impl SessionUserId {
    /// Stores the user id, cycling the session id to prevent fixation
    pub async fn insert(session: &Session, user_id: i32) -> Result<(), Error> {
        session.cycle_id().await?;
        session
            .insert(SESSION_USER_ID_KEY, SessionUserId(user_id))
            .await?;

        Ok(())
    }

    pub async fn get(session: &Session) -> Result<Option<i32>, Error> {
        Ok(session
            .get::<SessionUserId>(SESSION_USER_ID_KEY)
            .await?
            .map(|SessionUserId(id)| id))
    }
}

#[cfg(test)]
mod tests {
    mod insert {
        use hangar_test_utils::prelude::*;

        use crate::server::model::session::user::SessionUserId;

        /// Expect the stored id to be readable back
        #[tokio::test]
        async fn stores_user_id() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;

            SessionUserId::insert(&test.session, 12).await.unwrap();
            let result = SessionUserId::get(&test.session).await;

            assert_eq!(result.unwrap(), Some(12));

            Ok(())
        }
    }

    mod get {
        use hangar_test_utils::prelude::*;

        use crate::server::model::session::user::{SessionUserId, SESSION_USER_ID_KEY};

        /// Expect None for an anonymous session
        #[tokio::test]
        async fn returns_none_when_absent() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;

            let result = SessionUserId::get(&test.session).await;

            assert_eq!(result.unwrap(), None);

            Ok(())
        }

        /// Expect an error when the stored value is not a user id
        #[tokio::test]
        async fn fails_for_malformed_value() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;
            test.session
                .insert(SESSION_USER_ID_KEY, "not a number")
                .await
                .unwrap();

            let result = SessionUserId::get(&test.session).await;

            assert!(result.is_err());

            Ok(())
        }
    }
}
