//! Server application models.
//!
//! Application state shared by handlers and the scheduler, database model aliases, the
//! authenticated user with its role checks, and typed session values.

pub mod access;
pub mod app;
pub mod db;
pub mod dto;
pub mod session;
