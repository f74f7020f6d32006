use chrono::Utc;
use entity::sea_orm_active_enums::UserRole;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{constant::TEST_PASSWORD, error::TestError, TestContext};

impl TestContext {
    pub fn user(&self) -> UserFixtures<'_> {
        UserFixtures { context: self }
    }
}

pub struct UserFixtures<'a> {
    context: &'a TestContext,
}

impl<'a> UserFixtures<'a> {
    /// Inserts a user whose password is [`TEST_PASSWORD`]
    pub async fn insert_user(
        &self,
        email: &str,
        role: UserRole,
        pilot_id: Option<i32>,
        client_id: Option<i32>,
    ) -> Result<entity::user::Model, TestError> {
        // Minimum cost keeps hashing fast in tests
        let password_hash = bcrypt::hash(TEST_PASSWORD, 4)?;

        Ok(entity::prelude::User::insert(entity::user::ActiveModel {
            email: ActiveValue::Set(email.to_string()),
            name: ActiveValue::Set(email.split('@').next().unwrap_or(email).to_string()),
            password_hash: ActiveValue::Set(password_hash),
            role: ActiveValue::Set(role),
            pilot_id: ActiveValue::Set(pilot_id),
            client_id: ActiveValue::Set(client_id),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?)
    }

    pub async fn insert_admin(&self) -> Result<entity::user::Model, TestError> {
        self.insert_user("admin@example.com", UserRole::Admin, None, None)
            .await
    }

    pub async fn insert_staff(&self) -> Result<entity::user::Model, TestError> {
        self.insert_user("staff@example.com", UserRole::Staff, None, None)
            .await
    }

    /// Pilot account linked to `pilot_id`
    pub async fn insert_pilot_user(
        &self,
        pilot_id: i32,
    ) -> Result<entity::user::Model, TestError> {
        self.insert_user(
            &format!("pilot{}@example.com", pilot_id),
            UserRole::Pilot,
            Some(pilot_id),
            None,
        )
        .await
    }

    /// Client account linked to `client_id`
    pub async fn insert_client_user(
        &self,
        client_id: i32,
    ) -> Result<entity::user::Model, TestError> {
        self.insert_user(
            &format!("client{}@example.com", client_id),
            UserRole::Client,
            None,
            Some(client_id),
        )
        .await
    }
}
