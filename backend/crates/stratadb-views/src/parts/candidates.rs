//! Candidate expansion
//!
//! Builds the cheap part of the row-set: which tables, and for each table
//! which (replicated, active) combinations could possibly produce rows.
//! Nothing here touches a table's parts or its structure lock.

use std::collections::HashMap;
use std::sync::Arc;

use datafusion::arrow::array::{ArrayRef, AsArray, BooleanBuilder, RecordBatch, StringArray, StringBuilder};
use stratadb_commons::{DatabaseName, TableId};
use stratadb_store::{CatalogSnapshot, TableStorage};

use super::schema::PartsTableSchema;
use crate::error::{Result, ViewError};
use crate::predicate::PushdownPredicate;

/// (replicated, active) pairs, in the order rows are emitted per table
const FLAG_COMBINATIONS: [(bool, bool); 4] = [(false, false), (false, true), (true, false), (true, true)];

/// Candidate rows plus the storage handle captured for each table
#[derive(Debug)]
pub(crate) struct Candidates {
    pub batch: RecordBatch,
    pub storages: HashMap<TableId, Arc<dyn TableStorage>>,
}

/// Filter databases, then expand every part-based table of the survivors
/// into four candidate rows.
///
/// Returns `None` when no database survives the predicate.
pub(crate) fn expand_candidates(
    snapshot: &CatalogSnapshot,
    predicate: &PushdownPredicate<'_>,
) -> Result<Option<Candidates>> {
    let names: Vec<&str> = snapshot.database_names().map(|d| d.as_str()).collect();
    let databases = RecordBatch::try_new(
        PartsTableSchema::databases_schema(),
        vec![Arc::new(StringArray::from(names)) as ArrayRef],
    )?;

    let databases = predicate.filter_batch(&databases)?;
    if databases.num_rows() == 0 {
        log::trace!("system.parts: no database matches the predicate");
        return Ok(None);
    }

    let surviving = databases
        .column(0)
        .as_string_opt::<i32>()
        .ok_or_else(|| ViewError::Internal("database column is not Utf8".to_string()))?;

    let mut database_col = StringBuilder::new();
    let mut table_col = StringBuilder::new();
    let mut engine_col = StringBuilder::new();
    let mut replicated_col = BooleanBuilder::new();
    let mut active_col = BooleanBuilder::new();
    let mut storages: HashMap<TableId, Arc<dyn TableStorage>> = HashMap::new();

    for database in surviving.iter().flatten() {
        let Some(tables) = snapshot.tables(database) else {
            continue;
        };

        for (table_name, storage) in tables {
            if storage.part_storage().is_none() {
                continue;
            }

            for (replicated, active) in FLAG_COMBINATIONS {
                database_col.append_value(database);
                table_col.append_value(table_name.as_str());
                engine_col.append_value(storage.engine_name());
                replicated_col.append_value(replicated);
                active_col.append_value(active);
            }

            storages.insert(
                TableId::new(DatabaseName::new(database), table_name.clone()),
                Arc::clone(storage),
            );
        }
    }

    let batch = RecordBatch::try_new(
        PartsTableSchema::candidates_schema(),
        vec![
            Arc::new(database_col.finish()) as ArrayRef,
            Arc::new(table_col.finish()) as ArrayRef,
            Arc::new(engine_col.finish()) as ArrayRef,
            Arc::new(replicated_col.finish()) as ArrayRef,
            Arc::new(active_col.finish()) as ArrayRef,
        ],
    )?;

    log::trace!(
        "system.parts: {} candidate row(s) over {} table(s)",
        batch.num_rows(),
        storages.len()
    );

    Ok(Some(Candidates { batch, storages }))
}
