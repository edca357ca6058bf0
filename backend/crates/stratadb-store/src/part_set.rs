//! Ordered snapshots of data parts

use std::slice;
use std::sync::Arc;

use crate::part::DataPart;

/// An ordered snapshot of parts handed out by a dataset.
///
/// Each set owns one strong reference per part, so a part listed in two
/// live sets is counted twice by [`DataPart::ownership_count`]. Cloning a
/// set clones every part handle.
#[derive(Debug, Clone, Default)]
pub struct PartSet {
    parts: Vec<Arc<DataPart>>,
}

impl PartSet {
    /// Build a set from arbitrary parts, ordering them by part info.
    pub fn from_parts(mut parts: Vec<Arc<DataPart>>) -> Self {
        parts.sort_by(|a, b| a.info().cmp(b.info()));
        Self { parts }
    }

    /// Build a set from parts already ordered by part info.
    pub(crate) fn from_sorted(parts: Vec<Arc<DataPart>>) -> Self {
        debug_assert!(parts.windows(2).all(|w| w[0].info() < w[1].info()));
        Self { parts }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Arc<DataPart>> {
        self.parts.iter()
    }

    /// Whether this exact part object is a member of the set.
    pub fn contains(&self, part: &Arc<DataPart>) -> bool {
        self.parts
            .binary_search_by(|p| p.info().cmp(part.info()))
            .map(|idx| Arc::ptr_eq(&self.parts[idx], part))
            .unwrap_or(false)
    }

    pub fn names(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.name()).collect()
    }
}

impl<'a> IntoIterator for &'a PartSet {
    type Item = &'a Arc<DataPart>;
    type IntoIter = slice::Iter<'a, Arc<DataPart>>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(name: &str) -> Arc<DataPart> {
        Arc::new(DataPart::new(name, 1, 100, 1_700_000_000).unwrap())
    }

    #[test]
    fn test_from_parts_orders_by_info() {
        let set = PartSet::from_parts(vec![part("all_3_3_0"), part("all_1_1_0"), part("all_2_2_0")]);
        assert_eq!(set.names(), vec!["all_1_1_0", "all_2_2_0", "all_3_3_0"]);
    }

    #[test]
    fn test_contains_uses_identity() {
        let p1 = part("all_1_1_0");
        let set = PartSet::from_parts(vec![Arc::clone(&p1)]);
        assert!(set.contains(&p1));

        // Same name, different object
        let lookalike = part("all_1_1_0");
        assert!(!set.contains(&lookalike));
        assert!(!set.contains(&part("all_2_2_0")));
    }

    #[test]
    fn test_clone_adds_one_holder_per_part() {
        let p1 = part("all_1_1_0");
        let set = PartSet::from_parts(vec![Arc::clone(&p1)]);
        assert_eq!(DataPart::ownership_count(&p1), 2);
        let copy = set.clone();
        assert_eq!(DataPart::ownership_count(&p1), 3);
        drop(copy);
        drop(set);
        assert_eq!(DataPart::ownership_count(&p1), 1);
    }
}
