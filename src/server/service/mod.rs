//! Service layer for business logic.
//!
//! Services validate input, apply the visibility rules of the calling user, coordinate
//! repositories and provider clients, and convert models into DTOs. Notifications are
//! dispatched fire-and-forget from here so a failed email never fails a request.

pub mod analytics;
pub mod auth;
pub mod availability;
pub mod client;
pub mod compliance;
pub mod contract;
pub mod csv;
pub mod invoice;
pub mod job;
pub mod lead;
pub mod message;
pub mod payment;
pub mod pilot;
pub mod storage;
pub mod user;
pub mod webhook;
