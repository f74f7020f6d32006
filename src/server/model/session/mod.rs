//! Typed session values.
//!
//! Each submodule wraps one piece of session state stored through tower-sessions.

pub mod storage;
pub mod user;
