//! Shared test harness for the hangar workspace.
//!
//! Tests build a [`TestContext`] through [`TestBuilder`]: an in-memory SQLite database with
//! the requested tables, a memory-backed session and a mockito server standing in for every
//! third-party API.

pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod setup;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        test_setup_with_crm_tables, test_setup_with_tables, TestBuilder, TestContext, TestError,
    };
}
