use crate::error::Result;
use callbook_core::{CallFields, CallId, CallRecord, FieldPatch, Revision};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Condition a stored record must meet for an update to go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    Exists,
    Revision(Revision),
}

/// One logical collection of call documents.
///
/// Implementations own identifier and timestamp assignment: `insert` must
/// issue a fresh id and a `created_at` from the store's clock that is
/// strictly greater than any it issued before. Every call is one round trip;
/// nothing is cached.
pub trait DocumentBackend {
    fn backend_name(&self) -> &'static str;

    fn insert(&self, fields: &CallFields) -> Result<CallRecord>;

    fn fetch(&self, id: &CallId) -> Result<Option<CallRecord>>;

    /// All records ordered by `created_at`.
    fn list(&self, direction: SortDirection) -> Result<Vec<CallRecord>>;

    /// Overwrites the fields present in `patch`. `created_at` is never
    /// touched. Fails with `NotFound` when the id is unknown and with
    /// `Conflict` when a revision precondition does not hold.
    fn update(&self, id: &CallId, patch: &FieldPatch, precondition: &Precondition)
        -> Result<Revision>;

    /// Removes the record. Deleting an unknown id succeeds.
    fn delete(&self, id: &CallId) -> Result<()>;
}

impl<B: DocumentBackend + ?Sized> DocumentBackend for Box<B> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn insert(&self, fields: &CallFields) -> Result<CallRecord> {
        (**self).insert(fields)
    }

    fn fetch(&self, id: &CallId) -> Result<Option<CallRecord>> {
        (**self).fetch(id)
    }

    fn list(&self, direction: SortDirection) -> Result<Vec<CallRecord>> {
        (**self).list(direction)
    }

    fn update(
        &self,
        id: &CallId,
        patch: &FieldPatch,
        precondition: &Precondition,
    ) -> Result<Revision> {
        (**self).update(id, patch, precondition)
    }

    fn delete(&self, id: &CallId) -> Result<()> {
        (**self).delete(id)
    }
}
