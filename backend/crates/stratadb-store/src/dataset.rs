//! Part datasets
//!
//! A dataset is the part container of one table (or, for replicated tables,
//! one of its two part containers). It tracks every part it still owns and
//! which of those are active:
//!
//! - **active** parts are authoritative and together cover the table's data
//! - **inactive** parts were superseded by a merge but are kept until no
//!   reader holds them any more
//!
//! `active_parts()` ⊆ `all_parts()` holds for any single call pair made
//! without a concurrent commit in between. The two calls are not atomic
//! with respect to each other.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Result, StoreError};
use crate::part::{DataPart, PartInfo};
use crate::part_set::PartSet;

/// Read-side capability of a part container
pub trait PartDataset: Send + Sync + fmt::Debug {
    /// Snapshot of the currently active parts.
    fn active_parts(&self) -> PartSet;

    /// Snapshot of every part still owned by the dataset, active or not.
    fn all_parts(&self) -> PartSet;
}

#[derive(Debug)]
struct PartEntry {
    part: Arc<DataPart>,
    active: bool,
}

/// In-memory part container of a MergeTree-family table
///
/// Holds exactly one strong reference to each part it owns.
#[derive(Debug, Default)]
pub struct MergeTreeData {
    parts: RwLock<BTreeMap<PartInfo, PartEntry>>,
}

impl MergeTreeData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly written part and make it active.
    ///
    /// Every active part the new part covers is deactivated and stamped with
    /// the current time as its removal time.
    pub fn commit_part(&self, part: DataPart) -> Result<Arc<DataPart>> {
        let now = chrono::Utc::now().timestamp();
        let mut parts = self.parts.write();

        if parts.contains_key(part.info()) {
            return Err(StoreError::DuplicatePart(part.name().to_string()));
        }

        if let Some(covering) = parts
            .values()
            .find(|e| e.active && e.part.info().contains(part.info()))
        {
            return Err(StoreError::CoveredPart {
                part: part.name().to_string(),
                covering: covering.part.name().to_string(),
            });
        }

        let part = Arc::new(part);
        let mut superseded = 0usize;
        for entry in parts.values_mut() {
            if entry.active && part.info().contains(entry.part.info()) {
                entry.active = false;
                entry.part.mark_removed(now);
                superseded += 1;
            }
        }

        parts.insert(
            part.info().clone(),
            PartEntry {
                part: Arc::clone(&part),
                active: true,
            },
        );

        log::debug!(
            "Committed part {} ({} marks, {} bytes), superseded {} part(s)",
            part.name(),
            part.marks(),
            part.bytes(),
            superseded
        );

        Ok(part)
    }

    /// Physically forget inactive parts that were superseded at least
    /// `lifetime_secs` ago and are held by nobody but this dataset.
    ///
    /// Returns the names of the removed parts.
    pub fn clear_old_parts(&self, lifetime_secs: i64) -> Vec<String> {
        let now = chrono::Utc::now().timestamp();
        let mut parts = self.parts.write();

        let expired: Vec<PartInfo> = parts
            .iter()
            .filter(|(_, e)| {
                !e.active
                    && DataPart::ownership_count(&e.part) == 1
                    && now.saturating_sub(e.part.remove_time()) >= lifetime_secs
            })
            .map(|(info, _)| info.clone())
            .collect();

        let removed: Vec<String> = expired
            .iter()
            .filter_map(|info| parts.remove(info))
            .map(|e| e.part.name().to_string())
            .collect();

        if !removed.is_empty() {
            log::debug!("Removed {} old part(s): {:?}", removed.len(), removed);
        }

        removed
    }

    pub fn active_part_count(&self) -> usize {
        self.parts.read().values().filter(|e| e.active).count()
    }

    pub fn total_part_count(&self) -> usize {
        self.parts.read().len()
    }
}

impl PartDataset for MergeTreeData {
    fn active_parts(&self) -> PartSet {
        let parts = self.parts.read();
        PartSet::from_sorted(
            parts
                .values()
                .filter(|e| e.active)
                .map(|e| Arc::clone(&e.part))
                .collect(),
        )
    }

    fn all_parts(&self) -> PartSet {
        let parts = self.parts.read();
        PartSet::from_sorted(parts.values().map(|e| Arc::clone(&e.part)).collect())
    }
}
