use entity::sea_orm_active_enums::UserRole;
use sea_orm::DatabaseConnection;

use crate::{
    model::user::{CreateUserDto, UserDto},
    server::{
        data::{
            client::ClientRepository,
            pilot::PilotRepository,
            user::{NewUser, UserRepository},
        },
        error::Error,
        model::access::CurrentUser,
        util::validate::{self, MIN_PASSWORD_LEN},
    },
};

/// bcrypt work factor, lowered in unit tests to keep hashing fast
const PASSWORD_HASH_COST: u32 = if cfg!(test) { 4 } else { bcrypt::DEFAULT_COST };

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    /// Creates a new instance of [`UserService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a user account.
    ///
    /// Pilot and client accounts must link to an existing pilot or client record, back
    /// office accounts must not link to either.
    ///
    /// # Returns
    /// - `Ok(UserDto)` - Account created
    /// - `Err(Error::RequestError)` - Invalid input (400), missing linked record (400) or
    ///   email already registered (409)
    /// - `Err(Error::PasswordHashError)` - Hashing failed
    /// - `Err(Error::DbErr)` - Database operation failed
    pub async fn create(&self, user: CreateUserDto) -> Result<UserDto, Error> {
        let email = validate::email(&user.email)?;
        let name = validate::required_text("name", &user.name)?;
        if user.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let (pilot_id, client_id) = self
            .resolve_links(user.role, user.pilot_id, user.client_id)
            .await?;

        let user_repo = UserRepository::new(self.db);
        if user_repo.find_by_email(&email).await?.is_some() {
            return Err(Error::conflict(format!(
                "A user with email {} already exists",
                email
            )));
        }

        let password = user.password;
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(password, PASSWORD_HASH_COST))
                .await
                .map_err(|e| Error::InternalError(format!("Password hashing task failed: {}", e)))??;

        let created = user_repo
            .create(NewUser {
                email,
                name,
                password_hash,
                role: user.role,
                pilot_id,
                client_id,
            })
            .await?;

        tracing::info!(user_id = %created.id, "Created {:?} account", created.role);

        Ok(created.into())
    }

    async fn resolve_links(
        &self,
        role: UserRole,
        pilot_id: Option<i32>,
        client_id: Option<i32>,
    ) -> Result<(Option<i32>, Option<i32>), Error> {
        match role {
            UserRole::Admin | UserRole::Staff => {
                if pilot_id.is_some() || client_id.is_some() {
                    return Err(Error::validation(
                        "Only pilot and client accounts may link to a record",
                    ));
                }

                Ok((None, None))
            }
            UserRole::Pilot => {
                let pilot_id = pilot_id
                    .ok_or_else(|| Error::validation("pilot_id is required for pilot accounts"))?;
                if PilotRepository::new(self.db).get(pilot_id).await?.is_none() {
                    return Err(Error::validation(format!("Pilot {} does not exist", pilot_id)));
                }

                Ok((Some(pilot_id), None))
            }
            UserRole::Client => {
                let client_id = client_id.ok_or_else(|| {
                    Error::validation("client_id is required for client accounts")
                })?;
                if ClientRepository::new(self.db).get(client_id).await?.is_none() {
                    return Err(Error::validation(format!(
                        "Client {} does not exist",
                        client_id
                    )));
                }

                Ok((None, Some(client_id)))
            }
        }
    }

    pub async fn list(&self) -> Result<Vec<UserDto>, Error> {
        let users = UserRepository::new(self.db).list().await?;

        Ok(users.into_iter().map(UserDto::from).collect())
    }

    /// Deletes a user account; an admin cannot delete their own account
    pub async fn delete(&self, acting: &CurrentUser, user_id: i32) -> Result<(), Error> {
        if acting.id == user_id {
            return Err(Error::validation("You cannot delete your own account"));
        }

        let result = UserRepository::new(self.db).delete(user_id).await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("User", user_id));
        }

        tracing::info!(user_id = %user_id, deleted_by = %acting.id, "Deleted user");

        Ok(())
    }
}
