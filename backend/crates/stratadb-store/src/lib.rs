//! # stratadb-store
//!
//! In-memory model of StrataDB's part-based storage engines and the table
//! catalog that tracks them.
//!
//! ## Key Components
//!
//! - [`DataPart`] / [`PartInfo`]: one immutable data segment and its parsed name
//! - [`PartSet`]: an ordered, shared snapshot of parts handed out to readers
//! - [`MergeTreeData`]: the active/all part sets of one dataset
//! - [`TableStorage`] / [`PartStorage`]: capability traits every engine implements
//! - [`Catalog`]: database → table → storage registry with point-in-time snapshots
//!
//! ## Locking
//!
//! Two independent lock tiers exist. The catalog lock protects the name
//! mapping and is only held while copying or mutating it. Each table owns a
//! [`StructureLock`]: readers hold the shared side to keep the table from
//! being dropped or renamed underneath them, while inserts and merges never
//! touch it.

pub mod catalog;
pub mod dataset;
pub mod error;
pub mod part;
pub mod part_set;
pub mod storage;
pub mod structure_lock;

pub use catalog::{Catalog, CatalogSnapshot, Tables};
pub use dataset::{MergeTreeData, PartDataset};
pub use error::{Result, StoreError};
pub use part::{DataPart, PartInfo};
pub use part_set::PartSet;
pub use storage::{
    MemoryStorage, MergeTreeStorage, PartStorage, ReplicatedMergeTreeStorage, TableStorage,
};
pub use structure_lock::{StructureLock, TableStructureReadLock, TableStructureWriteLock};
