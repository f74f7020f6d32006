//! HTTP controller endpoints for the Hangar API.
//!
//! Handlers resolve the logged-in user from the tower-sessions session, check the role the
//! endpoint requires and hand off to a service. Every handler carries a utoipa path
//! definition so the OpenAPI document stays in step with the routes.

pub mod analytics;
pub mod auth;
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
pub mod util;
pub mod webhook;
