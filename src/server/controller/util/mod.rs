//! Helpers shared by controllers: CSRF checks for OAuth callbacks, resolving the logged-in
//! user, and CSV attachment responses.

pub mod csrf;
pub mod csv;
pub mod get_user;
