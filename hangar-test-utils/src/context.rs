//! Test context returned by [`TestBuilder`](crate::TestBuilder).

use std::sync::Arc;

use mockito::{Mock, Server, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};
use tower_sessions::{MemoryStore, Session};

use crate::error::TestError;

/// Running test environment.
///
/// ```ignore
/// let mut test = TestBuilder::new().with_crm_tables().build().await?;
///
/// let client = test.crm().insert_client("Acme Surveying", None).await?;
/// let url = test.server_url();
///
/// test.assert_mocks();
/// ```
pub struct TestContext {
    /// Connection to an in-memory SQLite database
    pub db: DatabaseConnection,
    /// Memory-backed session
    pub session: Session,
    /// Mock HTTP server standing in for third-party APIs
    pub server: ServerGuard,

    pub(crate) mocks: Vec<Mock>,
}

impl TestContext {
    pub(crate) async fn new() -> Result<Self, TestError> {
        let server = Server::new_async().await;

        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        let db = Database::connect("sqlite::memory:").await?;

        Ok(Self {
            db,
            session,
            server,
            mocks: Vec::new(),
        })
    }

    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Base URL of the mock server, used as every provider's API URL in tests
    pub fn server_url(&self) -> String {
        self.server.url()
    }

    /// Keeps a mock created during the test so [`Self::assert_mocks`] checks it
    pub fn push_mock(&mut self, mock: Mock) {
        self.mocks.push(mock);
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
