//! Table storages
//!
//! Every table in the catalog is backed by a [`TableStorage`]. Storages
//! built from parts additionally expose the [`PartStorage`] capability,
//! which is how readers discover part datasets without knowing the
//! concrete engine type:
//!
//! | Engine                | unreplicated dataset | replicated dataset |
//! |-----------------------|----------------------|--------------------|
//! | `MergeTree`           | always               | never              |
//! | `ReplicatedMergeTree` | optional             | always             |
//! | `Memory`              | (no part capability)                      |

use std::fmt;

use stratadb_commons::engines;

use crate::dataset::{MergeTreeData, PartDataset};
use crate::error::Result;
use crate::structure_lock::{StructureLock, TableStructureReadLock, TableStructureWriteLock};

/// Storage handle of one table
pub trait TableStorage: Send + Sync + fmt::Debug {
    /// Engine name as shown to users (e.g. "MergeTree")
    fn engine_name(&self) -> &str;

    /// Take the shared structure lock, protecting the table against DROP
    /// and RENAME until the guard is released.
    fn lock_structure(&self) -> Result<TableStructureReadLock<'_>>;

    /// Take the exclusive structure lock for DROP and RENAME.
    fn lock_structure_for_alter(&self) -> Result<TableStructureWriteLock<'_>>;

    /// Part datasets of this table, `None` for engines that are not built
    /// from parts.
    fn part_storage(&self) -> Option<&dyn PartStorage> {
        None
    }
}

/// Capability of storages whose data lives in parts
pub trait PartStorage: Send + Sync {
    /// Local (non-replicated) part dataset
    fn unreplicated_data(&self) -> Option<&dyn PartDataset>;

    /// Replicated part dataset
    fn replicated_data(&self) -> Option<&dyn PartDataset> {
        None
    }

    /// Forget superseded parts of every dataset that were removed at least
    /// `lifetime_secs` ago and are no longer held elsewhere. Returns the
    /// number of parts removed.
    fn clear_old_parts(&self, lifetime_secs: i64) -> usize;
}

/// Plain part-based storage
#[derive(Debug, Default)]
pub struct MergeTreeStorage {
    structure: StructureLock,
    data: MergeTreeData,
}

impl MergeTreeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &MergeTreeData {
        &self.data
    }
}

impl TableStorage for MergeTreeStorage {
    fn engine_name(&self) -> &str {
        engines::MERGE_TREE
    }

    fn lock_structure(&self) -> Result<TableStructureReadLock<'_>> {
        self.structure.read()
    }

    fn lock_structure_for_alter(&self) -> Result<TableStructureWriteLock<'_>> {
        self.structure.write()
    }

    fn part_storage(&self) -> Option<&dyn PartStorage> {
        Some(self)
    }
}

impl PartStorage for MergeTreeStorage {
    fn unreplicated_data(&self) -> Option<&dyn PartDataset> {
        Some(&self.data)
    }

    fn clear_old_parts(&self, lifetime_secs: i64) -> usize {
        self.data.clear_old_parts(lifetime_secs).len()
    }
}

/// Replicated part-based storage
///
/// Parts in `data` are coordinated cluster-wide. `unreplicated` holds parts
/// that only ever live on this replica (e.g. attached from a pre-replication
/// copy of the table); it exists only when requested at creation.
#[derive(Debug, Default)]
pub struct ReplicatedMergeTreeStorage {
    structure: StructureLock,
    data: MergeTreeData,
    unreplicated: Option<MergeTreeData>,
}

impl ReplicatedMergeTreeStorage {
    pub fn new(with_unreplicated: bool) -> Self {
        Self {
            structure: StructureLock::new(),
            data: MergeTreeData::new(),
            unreplicated: with_unreplicated.then(MergeTreeData::new),
        }
    }

    pub fn data(&self) -> &MergeTreeData {
        &self.data
    }

    pub fn unreplicated(&self) -> Option<&MergeTreeData> {
        self.unreplicated.as_ref()
    }
}

impl TableStorage for ReplicatedMergeTreeStorage {
    fn engine_name(&self) -> &str {
        engines::REPLICATED_MERGE_TREE
    }

    fn lock_structure(&self) -> Result<TableStructureReadLock<'_>> {
        self.structure.read()
    }

    fn lock_structure_for_alter(&self) -> Result<TableStructureWriteLock<'_>> {
        self.structure.write()
    }

    fn part_storage(&self) -> Option<&dyn PartStorage> {
        Some(self)
    }
}

impl PartStorage for ReplicatedMergeTreeStorage {
    fn unreplicated_data(&self) -> Option<&dyn PartDataset> {
        self.unreplicated.as_ref().map(|d| d as &dyn PartDataset)
    }

    fn replicated_data(&self) -> Option<&dyn PartDataset> {
        Some(&self.data)
    }

    fn clear_old_parts(&self, lifetime_secs: i64) -> usize {
        let unreplicated = self
            .unreplicated
            .as_ref()
            .map_or(0, |d| d.clear_old_parts(lifetime_secs).len());
        unreplicated + self.data.clear_old_parts(lifetime_secs).len()
    }
}

/// In-memory storage without parts
#[derive(Debug, Default)]
pub struct MemoryStorage {
    structure: StructureLock,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableStorage for MemoryStorage {
    fn engine_name(&self) -> &str {
        engines::MEMORY
    }

    fn lock_structure(&self) -> Result<TableStructureReadLock<'_>> {
        self.structure.read()
    }

    fn lock_structure_for_alter(&self) -> Result<TableStructureWriteLock<'_>> {
        self.structure.write()
    }
}
