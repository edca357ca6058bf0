//! Part enumeration and result assembly
//!
//! For each table that survived candidate filtering, takes the table's
//! structure lock, snapshots the needed part sets and appends one row per
//! part. The lock is held for exactly one table at a time.

use std::sync::Arc;

use datafusion::arrow::array::{
    ArrayRef, BooleanBuilder, RecordBatch, StringBuilder, TimestampSecondBuilder, UInt32Builder,
    UInt64Builder,
};
use stratadb_commons::TableId;
use stratadb_store::{DataPart, PartDataset, TableStorage};

use super::need_matrix::NeedMatrix;
use super::schema::PartsTableSchema;
use crate::error::{Result, ViewError};

/// Ownership count a user sees for `part`.
///
/// While a row is produced the part is also held by the view's all-parts
/// snapshot and, if active, by its active-parts snapshot. Those two holders
/// are not reported. The owning dataset is, so an idle part reports 1.
pub(crate) fn reported_refcount(part: &Arc<DataPart>, in_active_set: bool) -> u32 {
    let view_holders = if in_active_set { 2 } else { 1 };
    let count = DataPart::ownership_count(part).saturating_sub(view_holders);
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Column builders of the final result
pub(crate) struct PartRowsBuilder {
    name: StringBuilder,
    replicated: BooleanBuilder,
    active: BooleanBuilder,
    marks: UInt64Builder,
    bytes: UInt64Builder,
    modification_time: TimestampSecondBuilder,
    remove_time: TimestampSecondBuilder,
    refcount: UInt32Builder,
    database: StringBuilder,
    table: StringBuilder,
    engine: StringBuilder,
    rows: usize,
}

impl PartRowsBuilder {
    pub fn new() -> Self {
        Self {
            name: StringBuilder::new(),
            replicated: BooleanBuilder::new(),
            active: BooleanBuilder::new(),
            marks: UInt64Builder::new(),
            bytes: UInt64Builder::new(),
            modification_time: TimestampSecondBuilder::new(),
            remove_time: TimestampSecondBuilder::new(),
            refcount: UInt32Builder::new(),
            database: StringBuilder::new(),
            table: StringBuilder::new(),
            engine: StringBuilder::new(),
            rows: 0,
        }
    }

    fn append(&mut self, table_id: &TableId, engine: &str, part: &Arc<DataPart>, replicated: bool, active: bool) {
        self.name.append_value(part.name());
        self.replicated.append_value(replicated);
        self.active.append_value(active);
        self.marks.append_value(part.marks());
        self.bytes.append_value(part.bytes());
        self.modification_time.append_value(part.modification_time());
        self.remove_time.append_value(part.remove_time());
        self.refcount.append_value(reported_refcount(part, active));
        self.database.append_value(table_id.database().as_str());
        self.table.append_value(table_id.table_name().as_str());
        self.engine.append_value(engine);
        self.rows += 1;
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    /// Assemble the collected columns in schema order.
    pub fn finish(mut self) -> Result<RecordBatch> {
        let batch = RecordBatch::try_new(
            PartsTableSchema::schema(),
            vec![
                Arc::new(self.name.finish()) as ArrayRef,
                Arc::new(self.replicated.finish()) as ArrayRef,
                Arc::new(self.active.finish()) as ArrayRef,
                Arc::new(self.marks.finish()) as ArrayRef,
                Arc::new(self.bytes.finish()) as ArrayRef,
                Arc::new(self.modification_time.finish()) as ArrayRef,
                Arc::new(self.remove_time.finish()) as ArrayRef,
                Arc::new(self.refcount.finish()) as ArrayRef,
                Arc::new(self.database.finish()) as ArrayRef,
                Arc::new(self.table.finish()) as ArrayRef,
                Arc::new(self.engine.finish()) as ArrayRef,
            ],
        )?;
        Ok(batch)
    }
}

/// Append the parts of one dataset.
///
/// When inactive parts are not needed the full set is never fetched and the
/// active snapshot stands in for it.
fn enumerate_dataset(
    table_id: &TableId,
    engine: &str,
    dataset: &dyn PartDataset,
    replicated: bool,
    need: NeedMatrix,
    rows: &mut PartRowsBuilder,
) {
    let active_parts = dataset.active_parts();
    let (all_parts, all_is_active) = if need.needs_inactive(replicated) {
        (dataset.all_parts(), false)
    } else {
        (active_parts.clone(), true)
    };

    for part in &all_parts {
        let active = all_is_active || active_parts.contains(part);
        rows.append(table_id, engine, part, replicated, active);
    }
}

/// Append every needed part of one table while holding its structure lock.
pub(crate) fn enumerate_table(
    table_id: &TableId,
    storage: &dyn TableStorage,
    need: NeedMatrix,
    rows: &mut PartRowsBuilder,
) -> Result<()> {
    let _structure = storage
        .lock_structure()
        .map_err(|source| ViewError::StorageUnavailable {
            table: table_id.to_string(),
            source,
        })?;

    let parts = storage.part_storage().ok_or_else(|| {
        ViewError::Internal(format!("table {} no longer exposes part datasets", table_id))
    })?;
    let engine = storage.engine_name();

    let datasets = [(false, parts.unreplicated_data()), (true, parts.replicated_data())];
    for (replicated, dataset) in datasets {
        if !need.needs_dataset(replicated) {
            continue;
        }
        if let Some(dataset) = dataset {
            enumerate_dataset(table_id, engine, dataset, replicated, need, rows);
        }
    }

    Ok(())
}
