//! Clear-then-add synchronization of many-to-many associations.

use crate::planning::domain::LinkAccess;

/// Which existing links an update asks to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearSelection<T> {
    /// Remove nothing.
    Nothing,
    /// Remove the listed targets.
    Ids(Vec<T>),
    /// Remove every current target of the owner.
    All,
}

/// Link changes requested for one owner and one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationRequest<T> {
    add: Vec<T>,
    clear: ClearSelection<T>,
}

impl<T> Default for AssociationRequest<T> {
    fn default() -> Self {
        Self {
            add: Vec::new(),
            clear: ClearSelection::Nothing,
        }
    }
}

impl<T: Copy> AssociationRequest<T> {
    /// Creates a request that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the targets to link.
    #[must_use]
    pub fn with_add(mut self, ids: impl IntoIterator<Item = T>) -> Self {
        self.add = ids.into_iter().collect();
        self
    }

    /// Sets the targets to unlink before linking.
    #[must_use]
    pub fn with_clear(mut self, ids: impl IntoIterator<Item = T>) -> Self {
        self.clear = ClearSelection::Ids(ids.into_iter().collect());
        self
    }

    /// Requests that every current link be removed before linking.
    #[must_use]
    pub fn with_clear_all(mut self) -> Self {
        self.clear = ClearSelection::All;
        self
    }

    /// Targets to link.
    #[must_use]
    pub fn add(&self) -> &[T] {
        &self.add
    }

    /// Targets to unlink.
    #[must_use]
    pub const fn clear(&self) -> &ClearSelection<T> {
        &self.clear
    }

    /// Returns `true` when the request leaves the links untouched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_empty()
            && match &self.clear {
                ClearSelection::Nothing => true,
                ClearSelection::Ids(ids) => ids.is_empty(),
                ClearSelection::All => false,
            }
    }

    /// Every explicitly listed target, for existence lookups.
    #[must_use]
    pub fn referenced_ids(&self) -> Vec<T> {
        let cleared: &[T] = match &self.clear {
            ClearSelection::Ids(ids) => ids,
            ClearSelection::Nothing | ClearSelection::All => &[],
        };
        cleared.iter().chain(&self.add).copied().collect()
    }
}

/// Outcome of one synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport<T> {
    /// Targets that became linked.
    pub linked: Vec<T>,
    /// Targets that became unlinked.
    pub unlinked: Vec<T>,
    /// Listed targets that do not exist.
    pub skipped: Vec<T>,
}

impl<T> Default for SyncReport<T> {
    fn default() -> Self {
        Self {
            linked: Vec::new(),
            unlinked: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Applies a clear-then-add request to one side of a relation.
///
/// Cleared targets are unlinked first, then added targets are linked.
/// Listed ids for which `exists` is false are skipped without error. Linking
/// an already linked target and unlinking an unlinked one are no-ops, so
/// applying the same request twice gives the same links as applying it once.
pub fn synchronize<O, T, A>(
    links: &mut A,
    owner: O,
    request: &AssociationRequest<T>,
    exists: impl Fn(T) -> bool,
) -> SyncReport<T>
where
    A: LinkAccess<O, T> + ?Sized,
    O: Copy,
    T: Copy,
{
    let mut report = SyncReport::default();

    match request.clear() {
        ClearSelection::Nothing => {}
        ClearSelection::Ids(ids) => {
            for &target in ids {
                if !exists(target) {
                    report.skipped.push(target);
                } else if links.unlink(owner, target) {
                    report.unlinked.push(target);
                }
            }
        }
        ClearSelection::All => {
            for target in links.targets_of(owner) {
                if links.unlink(owner, target) {
                    report.unlinked.push(target);
                }
            }
        }
    }

    for &target in request.add() {
        if !exists(target) {
            report.skipped.push(target);
        } else if links.link(owner, target) {
            report.linked.push(target);
        }
    }

    report
}
