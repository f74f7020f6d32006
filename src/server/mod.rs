//! Server application core modules.
//!
//! This module contains all server-side functionality for hangar: HTTP routing, session
//! authentication, database repositories, business services, outbound integrations
//! (payments, e-signature, cloud storage, notifications) and the cron scheduler that sends
//! compliance and invoice reminders.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod integration;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
