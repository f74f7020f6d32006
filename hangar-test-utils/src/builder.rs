//! Declarative test builder.
//!
//! Configuration is queued on the builder and applied in one go by [`TestBuilder::build`].

use mockito::{Mock, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, DbBackend, EntityTrait, Schema};

use crate::{error::TestError, TestContext};

type MockBuilder = Box<dyn FnOnce(&mut ServerGuard) -> Mock>;

pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_crm_tables: bool,
    mock_builders: Vec<MockBuilder>,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_crm_tables: false,
            mock_builders: Vec::new(),
        }
    }

    /// Create the table for a single entity
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Create every table of the schema, parents before children
    pub fn with_crm_tables(mut self) -> Self {
        self.include_crm_tables = true;
        self
    }

    /// Register a mock endpoint that is asserted by [`TestContext::assert_mocks`]
    pub fn with_mock_endpoint<F>(mut self, builder: F) -> Self
    where
        F: FnOnce(&mut ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(builder));
        self
    }

    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut context = TestContext::new().await?;

        let mut tables = Vec::new();
        if self.include_crm_tables {
            tables.extend(crm_tables());
        }
        tables.extend(self.tables);

        context.with_tables(tables).await?;

        for builder in self.mock_builders {
            let mock = builder(&mut context.server);
            context.mocks.push(mock);
        }

        Ok(context)
    }
}

/// Create statements for every entity in foreign key order
pub fn crm_tables() -> Vec<TableCreateStatement> {
    use entity::prelude::*;

    let schema = Schema::new(DbBackend::Sqlite);

    vec![
        schema.create_table_from_entity(Client),
        schema.create_table_from_entity(Pilot),
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Job),
        schema.create_table_from_entity(JobAssignment),
        schema.create_table_from_entity(Invoice),
        schema.create_table_from_entity(Contract),
        schema.create_table_from_entity(Lead),
        schema.create_table_from_entity(ComplianceDoc),
        schema.create_table_from_entity(JobFile),
        schema.create_table_from_entity(Message),
        schema.create_table_from_entity(PilotAvailability),
        schema.create_table_from_entity(W9Form),
        schema.create_table_from_entity(PilotPayment),
        schema.create_table_from_entity(StorageConnection),
    ]
}
