//! Database and HTTP fixtures.
//!
//! - `user` - login accounts with a known password
//! - `crm` - clients, pilots, jobs and the records hanging off them
//! - `provider` - JSON bodies returned by mocked third-party APIs

pub mod crm;
pub mod provider;
pub mod user;
