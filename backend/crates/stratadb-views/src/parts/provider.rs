//! DataFusion binding of system.parts

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::catalog::Session;
use datafusion::datasource::{MemTable, TableProvider, TableType};
use datafusion::error::Result as DataFusionResult;
use datafusion::logical_expr::{Expr, TableProviderFilterPushDown};
use datafusion::physical_plan::ExecutionPlan;
use stratadb_store::Catalog;

use super::{PartsTableSchema, PartsView};
use crate::predicate::PushdownPredicate;

/// system.parts table provider
///
/// Every filter is accepted as `Inexact`: the view uses the filters to skip
/// work, and DataFusion re-applies them to the rows it returns.
#[derive(Debug)]
pub struct PartsTableProvider {
    view: PartsView,
}

impl PartsTableProvider {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            view: PartsView::new(catalog),
        }
    }

    pub fn view(&self) -> &PartsView {
        &self.view
    }
}

#[async_trait]
impl TableProvider for PartsTableProvider {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn schema(&self) -> SchemaRef {
        PartsTableSchema::schema()
    }

    fn table_type(&self) -> TableType {
        TableType::View
    }

    fn supports_filters_pushdown(
        &self,
        filters: &[&Expr],
    ) -> DataFusionResult<Vec<TableProviderFilterPushDown>> {
        Ok(vec![TableProviderFilterPushDown::Inexact; filters.len()])
    }

    async fn scan(
        &self,
        state: &dyn Session,
        projection: Option<&Vec<usize>>,
        filters: &[Expr],
        limit: Option<usize>,
    ) -> DataFusionResult<Arc<dyn ExecutionPlan>> {
        let batch = {
            let predicate = PushdownPredicate::new(filters, state.execution_props());
            self.view.materialize(&predicate)?
        };

        let table = MemTable::try_new(self.schema(), vec![vec![batch]])?;
        table.scan(state, projection, &[], limit).await
    }
}
