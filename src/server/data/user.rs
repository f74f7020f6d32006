use chrono::Utc;
use entity::sea_orm_active_enums::UserRole;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, QueryFilter, QueryOrder,
};

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

/// Fields of a new user, with the password already hashed
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub pilot_id: Option<i32>,
    pub client_id: Option<i32>,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, user: NewUser) -> Result<entity::user::Model, DbErr> {
        let user = entity::user::ActiveModel {
            email: ActiveValue::Set(user.email),
            name: ActiveValue::Set(user.name),
            password_hash: ActiveValue::Set(user.password_hash),
            role: ActiveValue::Set(user.role),
            pilot_id: ActiveValue::Set(user.pilot_id),
            client_id: ActiveValue::Set(user.client_id),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        user.insert(self.db).await
    }

    pub async fn get(&self, user_id: i32) -> Result<Option<entity::user::Model>, DbErr> {
        entity::prelude::User::find_by_id(user_id).one(self.db).await
    }

    /// Finds a user by email, compared lowercased
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<entity::user::Model>, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await
    }

    pub async fn list(&self) -> Result<Vec<entity::user::Model>, DbErr> {
        entity::prelude::User::find()
            .order_by_asc(entity::user::Column::Id)
            .all(self.db)
            .await
    }

    /// Users linked to a pilot record
    pub async fn find_by_pilot(
        &self,
        pilot_id: i32,
    ) -> Result<Vec<entity::user::Model>, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::PilotId.eq(pilot_id))
            .all(self.db)
            .await
    }

    /// Users linked to a client record
    pub async fn find_by_client(
        &self,
        client_id: i32,
    ) -> Result<Vec<entity::user::Model>, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::ClientId.eq(client_id))
            .all(self.db)
            .await
    }

    /// Deletes a user
    ///
    /// Returns OK regardless of user existing, to confirm the deletion result
    /// check the [`DeleteResult::rows_affected`] field.
    pub async fn delete(&self, user_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::User::delete_by_id(user_id)
            .exec(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    mod create {
        use entity::sea_orm_active_enums::UserRole;
        use hangar_test_utils::prelude::*;

        use crate::server::data::user::{NewUser, UserRepository};

        fn new_user(email: &str) -> NewUser {
            NewUser {
                email: email.to_string(),
                name: "Riley".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::Staff,
                pilot_id: None,
                client_id: None,
            }
        }

        /// Expect success when creating a new user
        #[tokio::test]
        async fn creates_user() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;

            let user_repo = UserRepository::new(&test.db);
            let result = user_repo.create(new_user("riley@example.com")).await;

            assert!(result.is_ok());

            Ok(())
        }

        /// Expect Error when the email is already taken
        #[tokio::test]
        async fn fails_for_duplicate_email() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;

            let user_repo = UserRepository::new(&test.db);
            user_repo.create(new_user("riley@example.com")).await?;
            let result = user_repo.create(new_user("riley@example.com")).await;

            assert!(result.is_err());

            Ok(())
        }

        /// Expect Error when linking to a pilot that does not exist
        #[tokio::test]
        async fn fails_for_nonexistent_pilot() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;

            let user_repo = UserRepository::new(&test.db);
            let mut user = new_user("pilot@example.com");
            user.role = UserRole::Pilot;
            user.pilot_id = Some(42);
            let result = user_repo.create(user).await;

            assert!(result.is_err());

            Ok(())
        }

        /// Expect Error when required tables are missing
        #[tokio::test]
        async fn fails_when_tables_missing() -> Result<(), TestError> {
            let test = test_setup_with_tables!()?;

            let user_repo = UserRepository::new(&test.db);
            let result = user_repo.create(new_user("riley@example.com")).await;

            assert!(result.is_err());

            Ok(())
        }
    }

    mod find_by_email {
        use hangar_test_utils::prelude::*;

        use crate::server::data::user::UserRepository;

        /// Expect lookup to ignore surrounding whitespace and case
        #[tokio::test]
        async fn matches_normalized_email() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let admin = test.user().insert_admin().await?;

            let user_repo = UserRepository::new(&test.db);
            let result = user_repo.find_by_email("  Admin@Example.com ").await?;

            assert_eq!(result.map(|u| u.id), Some(admin.id));

            Ok(())
        }

        /// Expect None for an unknown email
        #[tokio::test]
        async fn returns_none_for_unknown_email() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;

            let user_repo = UserRepository::new(&test.db);
            let result = user_repo.find_by_email("nobody@example.com").await?;

            assert!(result.is_none());

            Ok(())
        }
    }

    mod delete {
        use hangar_test_utils::prelude::*;

        use crate::server::data::user::UserRepository;

        /// Expect one row affected and the user gone
        #[tokio::test]
        async fn deletes_user() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let staff = test.user().insert_staff().await?;

            let user_repo = UserRepository::new(&test.db);
            let result = user_repo.delete(staff.id).await?;

            assert_eq!(result.rows_affected, 1);
            assert!(user_repo.get(staff.id).await?.is_none());

            Ok(())
        }

        /// Expect no rows affected for a user that does not exist
        #[tokio::test]
        async fn returns_zero_for_nonexistent_user() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;

            let user_repo = UserRepository::new(&test.db);
            let result = user_repo.delete(1).await?;

            assert_eq!(result.rows_affected, 0);

            Ok(())
        }
    }
}
