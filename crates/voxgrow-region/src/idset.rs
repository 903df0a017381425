//! Ordered sets of label ids
//!
//! Region bookkeeping is pure set algebra over label ids. `IdSet` keeps ids
//! sorted so iteration, and therefore tie-breaking during growth, is
//! deterministic. Removal is always [`IdSet::subtract`], which never inserts
//! an id that was not already present.

use std::collections::BTreeSet;
use std::collections::btree_set;

/// Sorted set of label ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSet {
    ids: BTreeSet<u32>,
}

impl IdSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the set holds no ids
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Membership test
    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    /// Insert one id, returning whether it was new
    pub fn insert(&mut self, id: u32) -> bool {
        self.ids.insert(id)
    }

    /// Remove one id, returning whether it was present
    pub fn remove(&mut self, id: u32) -> bool {
        self.ids.remove(&id)
    }

    /// Add every id of `other`
    pub fn union_with(&mut self, other: &IdSet) {
        self.ids.extend(other.ids.iter().copied());
    }

    /// Remove every id of `other`
    pub fn subtract(&mut self, other: &IdSet) {
        if other.len() < self.len() {
            for id in &other.ids {
                self.ids.remove(id);
            }
        } else {
            self.ids.retain(|id| !other.ids.contains(id));
        }
    }

    /// True if every id of `self` is in `other`
    pub fn is_subset(&self, other: &IdSet) -> bool {
        self.ids.is_subset(&other.ids)
    }

    /// True if the sets share no id
    pub fn is_disjoint(&self, other: &IdSet) -> bool {
        self.ids.is_disjoint(&other.ids)
    }

    /// Ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    /// Smallest id
    pub fn first(&self) -> Option<u32> {
        self.ids.first().copied()
    }

    /// Ids as a sorted vector
    pub fn to_vec(&self) -> Vec<u32> {
        self.ids.iter().copied().collect()
    }
}

impl FromIterator<u32> for IdSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<u32> for IdSet {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        self.ids.extend(iter);
    }
}

impl<'a> IntoIterator for &'a IdSet {
    type Item = &'a u32;
    type IntoIter = btree_set::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u32]) -> IdSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_union_and_subtract() {
        let mut a = set(&[1, 2, 3]);
        a.union_with(&set(&[3, 4]));
        assert_eq!(a.to_vec(), vec![1, 2, 3, 4]);
        a.subtract(&set(&[2, 9]));
        assert_eq!(a.to_vec(), vec![1, 3, 4]);
    }

    #[test]
    fn test_subtract_never_inserts() {
        // Removing ids that aren't present leaves the set alone
        let mut a = set(&[1, 2]);
        a.subtract(&set(&[5, 6, 7]));
        assert_eq!(a.to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_subset_disjoint() {
        assert!(set(&[1]).is_subset(&set(&[1, 2])));
        assert!(!set(&[3]).is_subset(&set(&[1, 2])));
        assert!(set(&[1, 2]).is_disjoint(&set(&[3])));
        assert_eq!(set(&[4, 2, 9]).first(), Some(2));
    }
}
