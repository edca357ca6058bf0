//! Per-table structure lock
//!
//! Guards a table's existence and identity, not its data. Readers that must
//! not see the table disappear mid-read take the shared side; DROP and
//! RENAME take the exclusive side. Inserts and merges never take it.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Result, StoreError};

#[derive(Debug, Default)]
struct StructureState {
    dropped: bool,
}

/// Structure lock embedded in every table storage
#[derive(Debug, Default)]
pub struct StructureLock {
    state: RwLock<StructureState>,
}

/// Shared structure lock; the table cannot be dropped or renamed while held.
#[must_use = "the table is only protected while the guard is alive"]
pub struct TableStructureReadLock<'a> {
    _guard: RwLockReadGuard<'a, StructureState>,
}

/// Exclusive structure lock taken by DROP and RENAME.
#[must_use = "the table is only protected while the guard is alive"]
pub struct TableStructureWriteLock<'a> {
    guard: RwLockWriteGuard<'a, StructureState>,
}

impl StructureLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the shared side. Fails once the table has been dropped.
    pub fn read(&self) -> Result<TableStructureReadLock<'_>> {
        let guard = self.state.read();
        if guard.dropped {
            return Err(StoreError::TableDropped);
        }
        Ok(TableStructureReadLock { _guard: guard })
    }

    /// Acquire the exclusive side, waiting for all readers to finish.
    /// Fails once the table has been dropped.
    pub fn write(&self) -> Result<TableStructureWriteLock<'_>> {
        let guard = self.state.write();
        if guard.dropped {
            return Err(StoreError::TableDropped);
        }
        Ok(TableStructureWriteLock { guard })
    }

    pub fn is_dropped(&self) -> bool {
        self.state.read().dropped
    }
}

impl TableStructureWriteLock<'_> {
    /// Permanently mark the table as dropped; later lock attempts fail.
    pub fn mark_dropped(mut self) {
        self.guard.dropped = true;
    }
}
