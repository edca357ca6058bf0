//! Data parts
//!
//! A part is an immutable data segment of one table. Its name encodes the
//! partition it belongs to, the block range it covers and its merge level:
//!
//! ```text
//! <partition>_<min_block>_<max_block>_<level>
//! 202401_1_1_0        freshly inserted block 1 of partition 202401
//! 202401_1_5_2        result of merging blocks 1..=5, second merge generation
//! ```
//!
//! The partition id may itself contain underscores (`20240101_20240131_1_5_1`),
//! so names are parsed from the right.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::error::{Result, StoreError};

/// Parsed form of a part name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartInfo {
    pub partition_id: String,
    pub min_block: u64,
    pub max_block: u64,
    pub level: u32,
}

impl PartInfo {
    /// Parse a part name into its components.
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = |reason: &str| StoreError::InvalidPartName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let mut fields = name.rsplitn(4, '_');
        let level = fields.next().ok_or_else(|| invalid("missing level"))?;
        let max_block = fields.next().ok_or_else(|| invalid("missing max block"))?;
        let min_block = fields.next().ok_or_else(|| invalid("missing min block"))?;
        let partition_id = fields.next().ok_or_else(|| invalid("missing partition id"))?;

        if partition_id.is_empty() {
            return Err(invalid("empty partition id"));
        }

        let level = level.parse::<u32>().map_err(|_| invalid("level is not a number"))?;
        let max_block = max_block
            .parse::<u64>()
            .map_err(|_| invalid("max block is not a number"))?;
        let min_block = min_block
            .parse::<u64>()
            .map_err(|_| invalid("min block is not a number"))?;

        if min_block > max_block {
            return Err(invalid("min block is greater than max block"));
        }

        Ok(Self {
            partition_id: partition_id.to_string(),
            min_block,
            max_block,
            level,
        })
    }

    /// Whether this part's data fully includes `other`'s data.
    pub fn contains(&self, other: &PartInfo) -> bool {
        self.partition_id == other.partition_id
            && self.min_block <= other.min_block
            && self.max_block >= other.max_block
            && self.level >= other.level
    }
}

impl Ord for PartInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partition_id
            .cmp(&other.partition_id)
            .then(self.min_block.cmp(&other.min_block))
            .then(self.max_block.cmp(&other.max_block))
            .then(self.level.cmp(&other.level))
    }
}

impl PartialOrd for PartInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PartInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.partition_id, self.min_block, self.max_block, self.level
        )
    }
}

/// Descriptor of one data part
///
/// Everything except `remove_time` is fixed at creation. `remove_time` is
/// stamped once, when a merge supersedes the part.
///
/// Parts are always handled through `Arc<DataPart>`; every holder (the
/// owning dataset, each snapshot [`PartSet`](crate::PartSet), readers and
/// mergers) owns one strong reference, which is what
/// [`DataPart::ownership_count`] reports.
#[derive(Debug)]
pub struct DataPart {
    name: String,
    info: PartInfo,
    marks: u64,
    bytes: u64,
    modification_time: i64,
    remove_time: AtomicI64,
}

impl DataPart {
    /// Create a part descriptor, validating its name.
    pub fn new(name: impl Into<String>, marks: u64, bytes: u64, modification_time: i64) -> Result<Self> {
        let name = name.into();
        let info = PartInfo::parse(&name)?;
        Ok(Self {
            name,
            info,
            marks,
            bytes,
            modification_time,
            remove_time: AtomicI64::new(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> &PartInfo {
        &self.info
    }

    /// Number of index marks (granules) in the part
    pub fn marks(&self) -> u64 {
        self.marks
    }

    /// Size of the part on disk in bytes
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Epoch seconds of the last modification of the part directory
    pub fn modification_time(&self) -> i64 {
        self.modification_time
    }

    /// Epoch seconds at which the part was superseded, 0 while it is not
    /// scheduled for removal.
    pub fn remove_time(&self) -> i64 {
        self.remove_time.load(AtomicOrdering::Acquire)
    }

    pub(crate) fn mark_removed(&self, at: i64) {
        self.remove_time.store(at, AtomicOrdering::Release);
    }

    /// Number of live holders of this part.
    pub fn ownership_count(this: &Arc<Self>) -> usize {
        Arc::strong_count(this)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_name() {
        let info = PartInfo::parse("202401_1_5_2").unwrap();
        assert_eq!(info.partition_id, "202401");
        assert_eq!(info.min_block, 1);
        assert_eq!(info.max_block, 5);
        assert_eq!(info.level, 2);
        assert_eq!(info.to_string(), "202401_1_5_2");
    }

    #[test]
    fn test_parse_partition_with_underscores() {
        let info = PartInfo::parse("20240101_20240131_1_5_1").unwrap();
        assert_eq!(info.partition_id, "20240101_20240131");
        assert_eq!(info.max_block, 5);
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        for name in ["", "all", "all_1", "all_1_2", "all_x_2_0", "all_3_2_0", "_1_2_0"] {
            assert!(
                matches!(PartInfo::parse(name), Err(StoreError::InvalidPartName { .. })),
                "expected {} to be rejected",
                name
            );
        }
    }

    #[test]
    fn test_contains() {
        let merged = PartInfo::parse("all_1_3_1").unwrap();
        assert!(merged.contains(&PartInfo::parse("all_1_1_0").unwrap()));
        assert!(merged.contains(&PartInfo::parse("all_2_3_0").unwrap()));
        assert!(merged.contains(&merged));
        assert!(!merged.contains(&PartInfo::parse("all_4_4_0").unwrap()));
        assert!(!merged.contains(&PartInfo::parse("other_1_1_0").unwrap()));
        assert!(!merged.contains(&PartInfo::parse("all_1_3_2").unwrap()));
    }

    #[test]
    fn test_ordering_by_partition_then_range() {
        let mut infos = vec![
            PartInfo::parse("b_1_1_0").unwrap(),
            PartInfo::parse("a_10_10_0").unwrap(),
            PartInfo::parse("a_2_2_0").unwrap(),
        ];
        infos.sort();
        let names: Vec<String> = infos.iter().map(|i| i.to_string()).collect();
        assert_eq!(names, vec!["a_2_2_0", "a_10_10_0", "b_1_1_0"]);
    }

    #[test]
    fn test_remove_time_and_ownership() {
        let part = Arc::new(DataPart::new("all_1_1_0", 3, 1024, 1_700_000_000).unwrap());
        assert_eq!(part.remove_time(), 0);
        part.mark_removed(1_700_000_100);
        assert_eq!(part.remove_time(), 1_700_000_100);

        assert_eq!(DataPart::ownership_count(&part), 1);
        let reader = Arc::clone(&part);
        assert_eq!(DataPart::ownership_count(&part), 2);
        drop(reader);
        assert_eq!(DataPart::ownership_count(&part), 1);
    }
}
