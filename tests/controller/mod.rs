//! Integration tests for the HTTP controllers.
//!
//! Handlers are called directly with their extractors, checking role gating and the status
//! codes each endpoint documents.

mod analytics;
mod auth;
mod client;
mod compliance;
mod contract;
mod invoice;
mod job;
mod lead;
mod message;
mod payment;
mod pilot;
mod storage;
mod user;
mod webhook;
