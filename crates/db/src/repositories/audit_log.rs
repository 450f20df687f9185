//! Audit log repository for database operations.
//!
//! Appends are plain inserts; the table carries no foreign keys and is
//! guarded against updates and deletes by triggers.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbBackend, FromQueryResult, Set, Statement,
};
use skledger_core::audit::{AuditError, AuditEvent, AuditLogEntry, AuditLogStore, AuditSink};
use skledger_shared::types::{ActorId, AuditLogId, TenantId};
use tracing::warn;
use uuid::Uuid;

use crate::entities::audit_logs;

const LIST_RECENT_SQL: &str = r"
SELECT
    l.id,
    l.actor_id,
    a.full_name AS actor_name,
    a.role::text AS actor_role,
    l.action,
    l.table_name,
    l.record_id,
    l.tenant_id,
    t.name AS tenant_name,
    l.details,
    l.created_at
FROM audit_logs l
LEFT JOIN actors a ON a.id = l.actor_id
LEFT JOIN tenants t ON t.id = l.tenant_id
ORDER BY l.created_at DESC, l.id DESC
LIMIT $1
";

/// Audit trail storage.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    db: DatabaseConnection,
}

impl AuditLogRepository {
    /// Creates a new audit log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct AuditLogRow {
    id: Uuid,
    actor_id: Uuid,
    actor_name: Option<String>,
    actor_role: Option<String>,
    action: String,
    table_name: String,
    record_id: Option<Uuid>,
    tenant_id: Option<Uuid>,
    tenant_name: Option<String>,
    details: serde_json::Value,
    created_at: DateTime<FixedOffset>,
}

impl AuditSink for AuditLogRepository {
    async fn append(&self, event: AuditEvent) -> Result<(), AuditError> {
        audit_logs::ActiveModel {
            id: Set(AuditLogId::new().into_inner()),
            actor_id: Set(event.actor_id.into_inner()),
            action: Set(event.action.as_str().to_string()),
            table_name: Set(event.table_name.to_string()),
            record_id: Set(event.record_id),
            tenant_id: Set(event.tenant_id.map(TenantId::into_inner)),
            details: Set(event.details),
            created_at: Set(event.occurred_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AuditError::Storage(e.to_string()))?;

        Ok(())
    }
}

impl AuditLogStore for AuditLogRepository {
    async fn list_recent(&self, limit: u64) -> Result<Vec<AuditLogEntry>, AuditError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = AuditLogRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            LIST_RECENT_SQL,
            [limit.into()],
        ))
        .all(&self.db)
        .await
        .map_err(|e| AuditError::Storage(e.to_string()))?;

        Ok(rows.into_iter().filter_map(row_to_domain).collect())
    }
}

/// Rows with an action this build does not know are skipped.
fn row_to_domain(row: AuditLogRow) -> Option<AuditLogEntry> {
    let action = match row.action.parse() {
        Ok(action) => action,
        Err(e) => {
            warn!(id = %row.id, error = %e, "Skipping audit entry");
            return None;
        }
    };

    Some(AuditLogEntry {
        id: AuditLogId::from_uuid(row.id),
        actor_id: ActorId::from_uuid(row.actor_id),
        actor_name: row.actor_name,
        actor_role: row.actor_role.and_then(|r| r.parse().ok()),
        action,
        table_name: row.table_name,
        record_id: row.record_id,
        tenant_id: row.tenant_id.map(TenantId::from_uuid),
        tenant_name: row.tenant_name,
        details: row.details,
        created_at: row.created_at.with_timezone(&Utc),
    })
}
