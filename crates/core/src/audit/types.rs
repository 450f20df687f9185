//! Audit domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skledger_shared::types::{ActorId, AuditLogId, TenantId};
use uuid::Uuid;

use crate::authz::ActorRole;

/// Default number of entries returned by a listing.
pub const DEFAULT_ENTRY_LIMIT: u64 = 50;

/// Largest number of entries a single listing may return.
pub const MAX_ENTRY_LIMIT: u64 = 500;

/// Kinds of audited actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Funds added to a tenant budget.
    BudgetAdd,
    /// Funds deducted from a tenant budget.
    BudgetDeduct,
    /// One tenant budget zeroed.
    BudgetReset,
    /// Every tenant budget zeroed.
    BudgetResetAll,
    /// Council member created.
    MemberCreate,
    /// Council member deleted.
    MemberDelete,
}

impl AuditAction {
    /// Returns the action as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetAdd => "budget_add",
            Self::BudgetDeduct => "budget_deduct",
            Self::BudgetReset => "budget_reset",
            Self::BudgetResetAll => "budget_reset_all",
            Self::MemberCreate => "member_create",
            Self::MemberDelete => "member_delete",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "budget_add" => Ok(Self::BudgetAdd),
            "budget_deduct" => Ok(Self::BudgetDeduct),
            "budget_reset" => Ok(Self::BudgetReset),
            "budget_reset_all" => Ok(Self::BudgetResetAll),
            "member_create" => Ok(Self::MemberCreate),
            "member_delete" => Ok(Self::MemberDelete),
            _ => Err(format!("Unknown audit action: {s}")),
        }
    }
}

/// An action waiting to be appended to the trail.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    /// Actor who performed the action.
    pub actor_id: ActorId,
    /// What was done.
    pub action: AuditAction,
    /// Table the affected record lives in.
    pub table_name: &'static str,
    /// Affected record, if the action targets one.
    pub record_id: Option<Uuid>,
    /// Tenant scope, if any.
    pub tenant_id: Option<TenantId>,
    /// Free-form detail payload.
    pub details: serde_json::Value,
    /// When the action happened.
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Starts an event for an action on a table.
    #[must_use]
    pub fn new(actor_id: ActorId, action: AuditAction, table_name: &'static str) -> Self {
        Self {
            actor_id,
            action,
            table_name,
            record_id: None,
            tenant_id: None,
            details: serde_json::Value::Null,
            occurred_at: Utc::now(),
        }
    }

    /// Sets the affected record.
    #[must_use]
    pub fn record(mut self, record_id: impl Into<Uuid>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }

    /// Sets the tenant scope.
    #[must_use]
    pub const fn tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Sets the detail payload.
    #[must_use]
    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// A stored audit entry joined with actor and tenant display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Entry ID.
    pub id: AuditLogId,
    /// Acting actor.
    pub actor_id: ActorId,
    /// Actor display name, if the actor still exists.
    pub actor_name: Option<String>,
    /// Actor role at read time.
    pub actor_role: Option<ActorRole>,
    /// What was done.
    pub action: AuditAction,
    /// Affected table.
    pub table_name: String,
    /// Affected record.
    pub record_id: Option<Uuid>,
    /// Tenant scope.
    pub tenant_id: Option<TenantId>,
    /// Tenant display name.
    pub tenant_name: Option<String>,
    /// Detail payload.
    pub details: serde_json::Value,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

/// Parameters for listing audit entries, most recent first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListEntriesQuery {
    /// Requested number of entries.
    pub limit: Option<u64>,
}

impl ListEntriesQuery {
    /// Returns the requested limit forced into `1..=MAX_ENTRY_LIMIT`.
    #[must_use]
    pub fn effective_limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_ENTRY_LIMIT)
            .clamp(1, MAX_ENTRY_LIMIT)
    }
}
