//! Request and response DTOs shared by the HTTP API.
//!
//! Status fields reuse the entity enums and travel as snake_case strings. Money is always
//! integer cents, dates are `YYYY-MM-DD` and timestamps are naive UTC.

pub mod analytics;
pub mod api;
pub mod availability;
pub mod client;
pub mod compliance;
pub mod contract;
pub mod invoice;
pub mod job;
pub mod lead;
pub mod message;
pub mod payment;
pub mod pilot;
pub mod storage;
pub mod user;
pub mod webhook;
