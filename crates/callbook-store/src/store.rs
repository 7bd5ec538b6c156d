use crate::backend::{DocumentBackend, Precondition, SortDirection};
use crate::error::Result;
use callbook_core::{CallFields, CallId, CallRecord, FieldPatch, Revision};
use tracing::debug;

/// Create/read/update/delete for call records over one document collection.
///
/// Only validated values are accepted, so validation failures can never
/// reach the backend. Each method is a single round trip with no retry; the
/// caller re-lists after a write to observe it.
pub struct CallStore<B> {
    backend: B,
}

impl<B: DocumentBackend> CallStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn create(&self, fields: &CallFields) -> Result<CallRecord> {
        let record = self.backend.insert(fields)?;
        debug!(backend = self.backend.backend_name(), id = %record.id, "call created");
        Ok(record)
    }

    /// Every record, most recent first.
    pub fn list_all(&self) -> Result<Vec<CallRecord>> {
        self.backend.list(SortDirection::Descending)
    }

    pub fn get(&self, id: &CallId) -> Result<Option<CallRecord>> {
        self.backend.fetch(id)
    }

    /// Last-writer-wins update of the fields present in `patch`.
    pub fn update(&self, id: &CallId, patch: &FieldPatch) -> Result<Revision> {
        let revision = self.backend.update(id, patch, &Precondition::Exists)?;
        debug!(backend = self.backend.backend_name(), id = %id, revision = %revision, "call updated");
        Ok(revision)
    }

    /// Like [`CallStore::update`], but fails with `Conflict` when the record
    /// changed after `expected` was read.
    pub fn update_if_revision(
        &self,
        id: &CallId,
        expected: &Revision,
        patch: &FieldPatch,
    ) -> Result<Revision> {
        let precondition = Precondition::Revision(expected.clone());
        let revision = self.backend.update(id, patch, &precondition)?;
        debug!(backend = self.backend.backend_name(), id = %id, revision = %revision, "call updated");
        Ok(revision)
    }

    pub fn delete(&self, id: &CallId) -> Result<()> {
        self.backend.delete(id)?;
        debug!(backend = self.backend.backend_name(), id = %id, "call deleted");
        Ok(())
    }
}
