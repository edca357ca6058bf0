//! Need matrix
//!
//! After the candidate rows have been filtered, each surviving row says
//! "this table may have rows with these (replicated, active) flags". The
//! matrix collects that per table so enumeration can skip datasets nobody
//! asked for, and skip fetching inactive parts when only active ones can
//! match.

use std::collections::HashMap;

use datafusion::arrow::array::{AsArray, RecordBatch};
use stratadb_commons::{DatabaseName, TableId, TableName};

use super::schema::columns;
use crate::error::{Result, ViewError};

/// Which (replicated, active) combinations are needed for one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeedMatrix {
    need: [[bool; 2]; 2],
}

impl NeedMatrix {
    pub fn set(&mut self, replicated: bool, active: bool) {
        self.need[usize::from(replicated)][usize::from(active)] = true;
    }

    pub fn needs(&self, replicated: bool, active: bool) -> bool {
        self.need[usize::from(replicated)][usize::from(active)]
    }

    /// Whether any row of the given dataset kind is needed
    pub fn needs_dataset(&self, replicated: bool) -> bool {
        self.needs(replicated, false) || self.needs(replicated, true)
    }

    /// Whether inactive parts of the given dataset kind are needed, i.e.
    /// whether the full part set must be fetched.
    pub fn needs_inactive(&self, replicated: bool) -> bool {
        self.needs(replicated, false)
    }
}

/// Group surviving candidate rows by table, in order of first appearance.
pub(crate) fn build_need_matrices(candidates: &RecordBatch) -> Result<Vec<(TableId, NeedMatrix)>> {
    let missing = |name: &str| ViewError::Internal(format!("candidate column '{}' is missing or mistyped", name));

    let databases = candidates
        .column_by_name(columns::DATABASE)
        .and_then(|c| c.as_string_opt::<i32>())
        .ok_or_else(|| missing(columns::DATABASE))?;
    let tables = candidates
        .column_by_name(columns::TABLE)
        .and_then(|c| c.as_string_opt::<i32>())
        .ok_or_else(|| missing(columns::TABLE))?;
    let replicated = candidates
        .column_by_name(columns::REPLICATED)
        .and_then(|c| c.as_boolean_opt())
        .ok_or_else(|| missing(columns::REPLICATED))?;
    let active = candidates
        .column_by_name(columns::ACTIVE)
        .and_then(|c| c.as_boolean_opt())
        .ok_or_else(|| missing(columns::ACTIVE))?;

    let mut matrices: Vec<(TableId, NeedMatrix)> = Vec::new();
    let mut positions: HashMap<TableId, usize> = HashMap::new();

    for row in 0..candidates.num_rows() {
        let table_id = TableId::new(
            DatabaseName::new(databases.value(row)),
            TableName::new(tables.value(row)),
        );
        let position = *positions.entry(table_id.clone()).or_insert_with(|| {
            matrices.push((table_id, NeedMatrix::default()));
            matrices.len() - 1
        });
        matrices[position]
            .1
            .set(replicated.value(row), active.value(row));
    }

    Ok(matrices)
}
