//! Request-scoped staging of planning changes.

use super::association::{AssociationRequest, SyncReport, synchronize};
use super::error::PlanningServiceResult;
use crate::planning::{
    domain::{LinkTable, RecordId},
    ports::{ChangeSet, LinkRow, PlanningStore, Record, StoreError},
};
use std::collections::BTreeSet;

/// Collects every write of one service call and commits them together.
///
/// Nothing reaches the store until [`UnitOfWork::commit`]. Dropping the unit
/// of work without committing discards the staged changes.
pub struct UnitOfWork<'s, S: PlanningStore + ?Sized> {
    store: &'s S,
    changes: ChangeSet,
}

impl<'s, S: PlanningStore + ?Sized> UnitOfWork<'s, S> {
    /// Starts an empty unit of work against a store.
    #[must_use]
    pub fn begin(store: &'s S) -> Self {
        Self {
            store,
            changes: ChangeSet::default(),
        }
    }

    /// Returns the store the unit of work reads from.
    #[must_use]
    pub const fn store(&self) -> &'s S {
        self.store
    }

    /// Returns the staged changes.
    #[must_use]
    pub const fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Reserves a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Persistence`](super::PlanningServiceError::Persistence)
    /// when the store cannot allocate or hands back a non-positive value.
    pub async fn allocate<I: RecordId>(&self) -> PlanningServiceResult<I> {
        let raw = self.store.next_id(I::KIND).await?;
        I::try_from(raw).map_err(|err| StoreError::persistence(err).into())
    }

    /// Returns the subset of `ids` that exist in the store.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn existing<I: RecordId>(&self, ids: &[I]) -> PlanningServiceResult<BTreeSet<I>> {
        if ids.is_empty() {
            return Ok(BTreeSet::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| (*id).into()).collect();
        let found = self.store.existing_ids(I::KIND, &raw).await?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| {
                let raw_id: i64 = (*id).into();
                found.contains(&raw_id)
            })
            .collect())
    }

    /// Stages a new record.
    pub fn insert<T: Record>(&mut self, record: T) {
        self.changes.insert(record);
    }

    /// Stages an overwrite of an existing record.
    pub fn update<T: Record>(&mut self, record: T) {
        self.changes.update(record);
    }

    /// Stages the removal of a record.
    pub fn remove<T: Record>(&mut self, id: T::Id) {
        self.changes.remove::<T>(id);
    }

    /// Synchronizes a relation from its left-hand side.
    ///
    /// `rows` are the committed link rows of `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error when resolving the listed ids fails.
    pub async fn sync_forward<L, R>(
        &mut self,
        rows: Vec<(L, R)>,
        owner: L,
        request: &AssociationRequest<R>,
    ) -> PlanningServiceResult<SyncReport<R>>
    where
        L: RecordId,
        R: RecordId,
        (L, R): LinkRow<Left = L, Right = R>,
    {
        let known = self.existing(&request.referenced_ids()).await?;
        let mut table = LinkTable::from_pairs(rows);
        let report = synchronize(&mut table, owner, request, |id| known.contains(&id));
        self.changes.stage_links(&table);
        log_report(owner, &report);
        Ok(report)
    }

    /// Synchronizes a relation from its right-hand side.
    ///
    /// `rows` are the committed link rows of `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error when resolving the listed ids fails.
    pub async fn sync_inverse<L, R>(
        &mut self,
        rows: Vec<(L, R)>,
        owner: R,
        request: &AssociationRequest<L>,
    ) -> PlanningServiceResult<SyncReport<L>>
    where
        L: RecordId,
        R: RecordId,
        (L, R): LinkRow<Left = L, Right = R>,
    {
        let known = self.existing(&request.referenced_ids()).await?;
        let mut table = LinkTable::from_pairs(rows);
        let report = synchronize(&mut table.inverse(), owner, request, |id| {
            known.contains(&id)
        });
        self.changes.stage_links(&table);
        log_report(owner, &report);
        Ok(report)
    }

    /// Commits the staged changes in one store call.
    ///
    /// # Errors
    ///
    /// Returns the store error mapped to a service error; nothing is applied
    /// in that case.
    pub async fn commit(self) -> PlanningServiceResult<()> {
        if self.changes.is_empty() {
            return Ok(());
        }
        self.store.commit(self.changes).await?;
        Ok(())
    }
}

fn log_report<O: RecordId, T: RecordId>(owner: O, report: &SyncReport<T>) {
    if !report.skipped.is_empty() {
        tracing::debug!(
            owner_kind = %O::KIND,
            owner = %owner,
            target_kind = %T::KIND,
            skipped = ?report.skipped,
            "skipped unknown association ids"
        );
    }
    tracing::trace!(
        owner_kind = %O::KIND,
        owner = %owner,
        linked = ?report.linked,
        unlinked = ?report.unlinked,
        "synchronized associations"
    );
}
