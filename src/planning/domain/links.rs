//! Relation index for many-to-many associations.
//!
//! A [`LinkTable`] stores each association once as a `(left, right)` pair.
//! The forward view reads it by left id and [`Inverse`] reads it by right id,
//! so linking from either side is visible from the other.

use std::collections::BTreeSet;

/// Link rows of one many-to-many relation, with pending additions and
/// removals tracked against the rows it was loaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTable<L, R> {
    pairs: BTreeSet<(L, R)>,
    added: BTreeSet<(L, R)>,
    removed: BTreeSet<(L, R)>,
}

impl<L, R> Default for LinkTable<L, R> {
    fn default() -> Self {
        Self {
            pairs: BTreeSet::new(),
            added: BTreeSet::new(),
            removed: BTreeSet::new(),
        }
    }
}

impl<L, R> LinkTable<L, R>
where
    L: Ord + Copy,
    R: Ord + Copy,
{
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from already persisted rows, with no pending changes.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (L, R)>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Returns `true` when `left` and `right` are linked.
    #[must_use]
    pub fn contains(&self, left: L, right: R) -> bool {
        self.pairs.contains(&(left, right))
    }

    /// Links `left` and `right`, returning `false` when they already were.
    pub fn link(&mut self, left: L, right: R) -> bool {
        let pair = (left, right);
        if !self.pairs.insert(pair) {
            return false;
        }
        if !self.removed.remove(&pair) {
            self.added.insert(pair);
        }
        true
    }

    /// Unlinks `left` and `right`, returning `false` when they were not linked.
    pub fn unlink(&mut self, left: L, right: R) -> bool {
        let pair = (left, right);
        if !self.pairs.remove(&pair) {
            return false;
        }
        if !self.added.remove(&pair) {
            self.removed.insert(pair);
        }
        true
    }

    /// Right-hand ids linked to `left`, in ascending order.
    #[must_use]
    pub fn rights_of(&self, left: L) -> Vec<R> {
        self.pairs
            .iter()
            .filter(|(l, _)| *l == left)
            .map(|(_, r)| *r)
            .collect()
    }

    /// Left-hand ids linked to `right`, in ascending order.
    #[must_use]
    pub fn lefts_of(&self, right: R) -> Vec<L> {
        self.pairs
            .iter()
            .filter(|(_, r)| *r == right)
            .map(|(l, _)| *l)
            .collect()
    }

    /// Iterates over all current rows.
    pub fn pairs(&self) -> impl Iterator<Item = (L, R)> + '_ {
        self.pairs.iter().copied()
    }

    /// Rows linked since the table was loaded.
    pub fn added(&self) -> impl Iterator<Item = (L, R)> + '_ {
        self.added.iter().copied()
    }

    /// Rows unlinked since the table was loaded.
    pub fn removed(&self) -> impl Iterator<Item = (L, R)> + '_ {
        self.removed.iter().copied()
    }

    /// Returns `true` when links were added or removed since loading.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// Returns a view keyed by the right-hand side.
    pub fn inverse(&mut self) -> Inverse<'_, L, R> {
        Inverse(self)
    }
}

/// Right-to-left view of a [`LinkTable`].
#[derive(Debug)]
pub struct Inverse<'a, L, R>(&'a mut LinkTable<L, R>);

/// Owner-centred access to one side of a relation.
///
/// The association synchronizer is written against this trait so it can
/// drive either side of every relation.
pub trait LinkAccess<O, T> {
    /// Returns `true` when `owner` is linked to `target`.
    fn is_linked(&self, owner: O, target: T) -> bool;

    /// Links `owner` to `target`, returning `false` when already linked.
    fn link(&mut self, owner: O, target: T) -> bool;

    /// Unlinks `owner` from `target`, returning `false` when not linked.
    fn unlink(&mut self, owner: O, target: T) -> bool;

    /// Targets currently linked to `owner`.
    fn targets_of(&self, owner: O) -> Vec<T>;
}

impl<L, R> LinkAccess<L, R> for LinkTable<L, R>
where
    L: Ord + Copy,
    R: Ord + Copy,
{
    fn is_linked(&self, owner: L, target: R) -> bool {
        self.contains(owner, target)
    }

    fn link(&mut self, owner: L, target: R) -> bool {
        Self::link(self, owner, target)
    }

    fn unlink(&mut self, owner: L, target: R) -> bool {
        Self::unlink(self, owner, target)
    }

    fn targets_of(&self, owner: L) -> Vec<R> {
        self.rights_of(owner)
    }
}

impl<L, R> LinkAccess<R, L> for Inverse<'_, L, R>
where
    L: Ord + Copy,
    R: Ord + Copy,
{
    fn is_linked(&self, owner: R, target: L) -> bool {
        self.0.contains(target, owner)
    }

    fn link(&mut self, owner: R, target: L) -> bool {
        self.0.link(target, owner)
    }

    fn unlink(&mut self, owner: R, target: L) -> bool {
        self.0.unlink(target, owner)
    }

    fn targets_of(&self, owner: R) -> Vec<L> {
        self.0.lefts_of(owner)
    }
}
