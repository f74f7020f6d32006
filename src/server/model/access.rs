//! The authenticated user and the role checks applied by every controller.
//!
//! Admin and staff form the back office and may read and write every CRM resource. Pilot
//! and client accounts are linked to their pilot or client record and only ever see data
//! attached to it.

use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::UserRole;

use crate::{
    model::user::UserDto,
    server::{
        error::{auth::AuthError, Error},
        model::db::UserModel,
    },
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub pilot_id: Option<i32>,
    pub client_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl From<UserModel> for CurrentUser {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            pilot_id: user.pilot_id,
            client_id: user.client_id,
            created_at: user.created_at,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admin or staff
    pub fn is_back_office(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Staff)
    }

    /// Pilot record linked to a pilot account
    pub fn own_pilot_id(&self) -> Option<i32> {
        match self.role {
            UserRole::Pilot => self.pilot_id,
            _ => None,
        }
    }

    /// Client record linked to a client account
    pub fn own_client_id(&self) -> Option<i32> {
        match self.role {
            UserRole::Client => self.client_id,
            _ => None,
        }
    }

    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            return Ok(());
        }

        Err(AuthError::Forbidden.into())
    }

    pub fn require_back_office(&self) -> Result<(), Error> {
        if self.is_back_office() {
            return Ok(());
        }

        Err(AuthError::Forbidden.into())
    }

    /// Back office, or the pilot account linked to `pilot_id`
    pub fn require_pilot_or_back_office(&self, pilot_id: i32) -> Result<(), Error> {
        if self.is_back_office() || self.own_pilot_id() == Some(pilot_id) {
            return Ok(());
        }

        Err(AuthError::Forbidden.into())
    }

    /// Back office, or the client account linked to `client_id`
    pub fn require_client_or_back_office(&self, client_id: i32) -> Result<(), Error> {
        if self.is_back_office() || self.own_client_id() == Some(client_id) {
            return Ok(());
        }

        Err(AuthError::Forbidden.into())
    }
}

impl From<CurrentUser> for UserDto {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            pilot_id: user.pilot_id,
            client_id: user.client_id,
            created_at: user.created_at,
        }
    }
}
