//! system.parts: one row per data part of every part-based table
//!
//! Materialization runs in four stages, each cheaper stage narrowing the
//! work of the next:
//!
//! 1. **Candidate expansion**: snapshot the catalog, filter databases, then
//!    expand each part-based table into four (replicated, active) rows
//! 2. **Need matrix**: filter the candidate rows and record, per table,
//!    which combinations survived
//! 3. **Part enumeration**: under each table's structure lock, fetch only
//!    the part sets the matrix asks for
//! 4. **Result assembly**: emit the final columns in schema order
//!
//! An empty row-set after stage 1 or 2 ends the read before any table lock
//! is taken.

mod candidates;
mod enumerate;
mod need_matrix;
mod provider;
pub mod schema;

use std::sync::Arc;

use datafusion::arrow::array::RecordBatch;
use datafusion::arrow::datatypes::SchemaRef;
use stratadb_store::Catalog;

use crate::error::{Result, ViewError};
use crate::predicate::PushdownPredicate;

pub use need_matrix::NeedMatrix;
pub use provider::PartsTableProvider;
pub use schema::{parts_schema, PartsTableSchema};

use candidates::expand_candidates;
use enumerate::{enumerate_table, PartRowsBuilder};
use need_matrix::build_need_matrices;

/// Materializer of system.parts over one catalog
#[derive(Debug, Clone)]
pub struct PartsView {
    catalog: Arc<Catalog>,
}

impl PartsView {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn schema(&self) -> SchemaRef {
        PartsTableSchema::schema()
    }

    /// Build the rows of system.parts that may satisfy `predicate`.
    ///
    /// The result is a superset of the matching rows: conjuncts over part
    /// columns (name, bytes, ...) are left to the caller.
    pub fn materialize(&self, predicate: &PushdownPredicate<'_>) -> Result<RecordBatch> {
        let snapshot = self.catalog.snapshot();

        let Some(candidates) = expand_candidates(&snapshot, predicate)? else {
            return Ok(RecordBatch::new_empty(self.schema()));
        };
        drop(snapshot);

        let surviving = predicate.filter_batch(&candidates.batch)?;
        if surviving.num_rows() == 0 {
            log::trace!("system.parts: no candidate table matches the predicate");
            return Ok(RecordBatch::new_empty(self.schema()));
        }

        let needs = build_need_matrices(&surviving)?;
        let mut rows = PartRowsBuilder::new();
        for (table_id, need) in &needs {
            let storage = candidates.storages.get(table_id).ok_or_else(|| {
                ViewError::Internal(format!("no storage captured for candidate table {}", table_id))
            })?;
            enumerate_table(table_id, storage.as_ref(), *need, &mut rows)?;
        }

        log::debug!(
            "system.parts: enumerated {} table(s), {} part row(s)",
            needs.len(),
            rows.len()
        );

        rows.finish()
    }
}
