//! Utility functions shared by services, controllers and the scheduler.
//!
//! - `csv` - reading and writing CSV imports and exports
//! - `time` - calendar arithmetic for reporting periods and expiry windows
//! - `validate` - normalizing and checking request input

pub mod csv;
pub mod time;
pub mod validate;
