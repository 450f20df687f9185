//! Tenant (barangay) registry.
//!
//! Tenants are created by provisioning and are effectively immutable here;
//! the registry only exposes lookups.

use std::cmp::Ordering;
use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use skledger_shared::types::{ActorId, TenantId};
use thiserror::Error;

use crate::authz::{ActorDirectory, AuthzError, Operation, authorize_actor};

/// One administrative subdivision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant ID.
    pub id: TenantId,
    /// Display name.
    pub name: String,
    /// Short code, unique across tenants.
    pub code: String,
}

/// Tenant registry errors.
#[derive(Debug, Error)]
pub enum TenantError {
    /// The caller may not perform the lookup.
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// Storage failure.
    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Repository trait for tenant lookups.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait TenantRepository: Send + Sync {
    /// List every tenant.
    fn list(&self) -> impl Future<Output = Result<Vec<Tenant>, TenantError>> + Send;

    /// Find a tenant by ID.
    fn find_by_id(
        &self,
        id: TenantId,
    ) -> impl Future<Output = Result<Option<Tenant>, TenantError>> + Send;
}

/// Read-only tenant registry.
pub struct TenantRegistry<R: TenantRepository, D: ActorDirectory> {
    repo: Arc<R>,
    directory: Arc<D>,
}

impl<R: TenantRepository, D: ActorDirectory> TenantRegistry<R, D> {
    /// Create a new registry.
    #[must_use]
    pub fn new(repo: Arc<R>, directory: Arc<D>) -> Self {
        Self { repo, directory }
    }

    /// Lists all tenants ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is unknown or inactive, or storage fails.
    pub async fn list_tenants(&self, actor_id: ActorId) -> Result<Vec<Tenant>, TenantError> {
        authorize_actor(self.directory.as_ref(), actor_id, &Operation::ListTenants).await?;

        let mut tenants = self.repo.list().await?;
        sort_by_name(&mut tenants);
        Ok(tenants)
    }

    /// Finds one tenant by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is unknown or inactive, or storage fails.
    pub async fn find_tenant(
        &self,
        actor_id: ActorId,
        tenant_id: TenantId,
    ) -> Result<Option<Tenant>, TenantError> {
        authorize_actor(self.directory.as_ref(), actor_id, &Operation::ListTenants).await?;
        self.repo.find_by_id(tenant_id).await
    }
}

/// Orders tenants by name, then code for equal names.
pub fn sort_by_name(tenants: &mut [Tenant]) {
    tenants.sort_by(compare_by_name);
}

/// Name order, with the code as tie-breaker.
#[must_use]
pub fn compare_by_name(a: &Tenant, b: &Tenant) -> Ordering {
    a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code))
}
