use sea_orm::DatabaseConnection;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, Error},
    model::access::CurrentUser,
};

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuthService<'a> {
    /// Creates a new instance of [`AuthService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Verifies an email and password pair.
    ///
    /// Unknown emails and wrong passwords fail identically so the response never reveals
    /// whether an account exists.
    ///
    /// # Returns
    /// - `Ok(CurrentUser)` - Credentials are valid
    /// - `Err(Error::AuthError(AuthError::InvalidCredentials))` - Unknown email or wrong password
    /// - `Err(Error::DbErr)` - Database operation failed
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, Error> {
        let user_repo = UserRepository::new(self.db);

        let Some(user) = user_repo.find_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };

        if !bcrypt::verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login rejected, wrong password");

            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    mod login {
        use hangar_test_utils::{constant::TEST_PASSWORD, prelude::*};

        use crate::server::{
            error::{auth::AuthError, Error},
            service::auth::AuthService,
        };

        /// Expect the user back for a correct password, with email case ignored
        #[tokio::test]
        async fn accepts_valid_credentials() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let admin = test.user().insert_admin().await?;

            let auth_service = AuthService::new(&test.db);
            let result = auth_service.login("Admin@Example.com", TEST_PASSWORD).await;

            assert_eq!(result.unwrap().id, admin.id);

            Ok(())
        }

        /// Expect InvalidCredentials for a wrong password
        #[tokio::test]
        async fn rejects_wrong_password() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            test.user().insert_admin().await?;

            let auth_service = AuthService::new(&test.db);
            let result = auth_service.login("admin@example.com", "wrong-password").await;

            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::InvalidCredentials))
            ));

            Ok(())
        }

        /// Expect InvalidCredentials for an unknown email
        #[tokio::test]
        async fn rejects_unknown_email() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;

            let auth_service = AuthService::new(&test.db);
            let result = auth_service.login("nobody@example.com", TEST_PASSWORD).await;

            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::InvalidCredentials))
            ));

            Ok(())
        }
    }
}
