//! System Schema Provider
//!
//! DataFusion SchemaProvider for the `system` schema. View providers are
//! created once, up front; each read materializes fresh rows.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use datafusion::catalog::SchemaProvider;
use datafusion::datasource::{TableProvider, TableType};
use datafusion::error::Result as DataFusionResult;
use datafusion::prelude::SessionContext;
use stratadb_commons::SystemTable;
use stratadb_store::Catalog;

use crate::error::{Result, ViewError};
use crate::parts::PartsTableProvider;

/// DataFusion SchemaProvider for the `system` schema
#[derive(Debug)]
pub struct SystemSchemaProvider {
    parts: Arc<PartsTableProvider>,
}

impl SystemSchemaProvider {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            parts: Arc::new(PartsTableProvider::new(catalog)),
        }
    }

    fn provider(&self, system_table: SystemTable) -> Arc<dyn TableProvider> {
        match system_table {
            SystemTable::Parts => Arc::clone(&self.parts) as Arc<dyn TableProvider>,
        }
    }
}

#[async_trait]
impl SchemaProvider for SystemSchemaProvider {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn table_names(&self) -> Vec<String> {
        SystemTable::ALL
            .iter()
            .map(|table| table.table_name().to_string())
            .collect()
    }

    async fn table(&self, name: &str) -> DataFusionResult<Option<Arc<dyn TableProvider>>> {
        Ok(SystemTable::from_name(name)
            .ok()
            .map(|table| self.provider(table)))
    }

    fn table_exist(&self, name: &str) -> bool {
        SystemTable::from_name(name).is_ok()
    }

    async fn table_type(&self, name: &str) -> DataFusionResult<Option<TableType>> {
        Ok(SystemTable::from_name(name).ok().map(|_| TableType::View))
    }
}

/// Register the system schema under `schema_name` in the session's default
/// catalog.
pub fn register_system_schema(
    ctx: &SessionContext,
    catalog: Arc<Catalog>,
    schema_name: &str,
) -> Result<()> {
    let catalog_name = ctx.copied_config().options().catalog.default_catalog.clone();
    let df_catalog = ctx.catalog(&catalog_name).ok_or_else(|| {
        ViewError::Internal(format!("default catalog '{}' is not registered", catalog_name))
    })?;

    df_catalog.register_schema(schema_name, Arc::new(SystemSchemaProvider::new(catalog)))?;

    log::debug!(
        "Registered system schema {}.{} ({} view(s))",
        catalog_name,
        schema_name,
        SystemTable::ALL.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider() -> SystemSchemaProvider {
        SystemSchemaProvider::new(Arc::new(Catalog::new()))
    }

    #[test]
    fn test_table_names() {
        let provider = create_test_provider();
        assert_eq!(provider.table_names(), vec!["parts".to_string()]);
        assert!(provider.table_exist("parts"));
        assert!(!provider.table_exist("nonexistent"));
    }

    #[tokio::test]
    async fn test_parts_provider_is_shared() {
        let provider = create_test_provider();

        let first = provider.table("parts").await.unwrap().unwrap();
        let second = provider.table("parts").await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.table_type(), TableType::View);
    }

    #[tokio::test]
    async fn test_unknown_table_returns_none() {
        let provider = create_test_provider();
        assert!(provider.table("nonexistent_table").await.unwrap().is_none());
        assert_eq!(provider.table_type("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_in_session() {
        let ctx = SessionContext::new();
        register_system_schema(&ctx, Arc::new(Catalog::new()), "system").unwrap();

        let batches = ctx
            .sql("SELECT count(*) FROM system.parts")
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 1);
    }
}
