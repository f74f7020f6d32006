//! Shorthand macros over [`TestBuilder`](crate::TestBuilder).

/// Build a context with only the given entity tables (or none).
#[macro_export]
macro_rules! test_setup_with_tables {
    () => {{
        $crate::TestBuilder::new().build().await
    }};

    ($($entity:expr),+ $(,)?) => {{
        $crate::TestBuilder::new()
            $(.with_table($entity))+
            .build()
            .await
    }};
}

/// Build a context with every table of the schema.
#[macro_export]
macro_rules! test_setup_with_crm_tables {
    () => {{
        $crate::TestBuilder::new().with_crm_tables().build().await
    }};
}
