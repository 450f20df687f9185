//! Read side of the audit trail.

use std::future::Future;
use std::sync::Arc;

use skledger_shared::types::ActorId;

use super::error::AuditError;
use super::types::{AuditLogEntry, ListEntriesQuery};
use crate::authz::{ActorDirectory, Operation, authorize_actor};

/// Repository trait for reading stored audit entries.
pub trait AuditLogStore: Send + Sync {
    /// Most recent entries first, joined with actor and tenant names.
    fn list_recent(
        &self,
        limit: u64,
    ) -> impl Future<Output = Result<Vec<AuditLogEntry>, AuditError>> + Send;
}

/// Audit trail reader.
pub struct AuditTrail<S: AuditLogStore, D: ActorDirectory> {
    store: Arc<S>,
    directory: Arc<D>,
}

impl<S: AuditLogStore, D: ActorDirectory> AuditTrail<S, D> {
    /// Create a new reader.
    #[must_use]
    pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
        Self { store, directory }
    }

    /// Lists audit entries, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Authz` unless the actor is a main admin.
    pub async fn list_entries(
        &self,
        actor_id: ActorId,
        query: &ListEntriesQuery,
    ) -> Result<Vec<AuditLogEntry>, AuditError> {
        authorize_actor(self.directory.as_ref(), actor_id, &Operation::ViewAuditLog).await?;
        self.store.list_recent(query.effective_limit()).await
    }
}
