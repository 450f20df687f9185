//! Tenant repository for database operations.

use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use skledger_core::tenant::{Tenant, TenantError, TenantRepository as TenantRepoTrait};
use skledger_shared::types::TenantId;

use crate::entities::tenants;

/// Tenant lookups.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    db: DatabaseConnection,
}

impl TenantRepository {
    /// Creates a new tenant repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl TenantRepoTrait for TenantRepository {
    async fn list(&self) -> Result<Vec<Tenant>, TenantError> {
        let models = tenants::Entity::find()
            .order_by_asc(tenants::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| TenantError::Storage(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn find_by_id(&self, id: TenantId) -> Result<Option<Tenant>, TenantError> {
        let model = tenants::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| TenantError::Storage(e.to_string()))?;

        Ok(model.map(to_domain))
    }
}

pub(crate) fn to_domain(model: tenants::Model) -> Tenant {
    Tenant {
        id: TenantId::from_uuid(model.id),
        name: model.name,
        code: model.code,
    }
}
