//! Actor identity and role definitions.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skledger_shared::types::{ActorId, TenantId};

use super::error::AuthzError;

/// Roles an actor can hold in the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Municipal administrator with authority over every barangay.
    MainAdmin,
    /// SK chairperson of one barangay.
    SkChairman,
    /// SK secretary of one barangay.
    SkSecretary,
    /// SK council member of one barangay.
    Kagawad,
}

impl ActorRole {
    /// Returns true if actors with this role must be bound to a tenant.
    #[must_use]
    pub const fn requires_tenant(&self) -> bool {
        !matches!(self, Self::MainAdmin)
    }

    /// Returns the role as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MainAdmin => "main_admin",
            Self::SkChairman => "sk_chairman",
            Self::SkSecretary => "sk_secretary",
            Self::Kagawad => "kagawad",
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main_admin" => Ok(Self::MainAdmin),
            "sk_chairman" => Ok(Self::SkChairman),
            "sk_secretary" => Ok(Self::SkSecretary),
            "kagawad" => Ok(Self::Kagawad),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// An authenticated identity as known to the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Actor ID (the session token subject).
    pub id: ActorId,
    /// Display name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Current role.
    pub role: ActorRole,
    /// Tenant binding; `None` only for main admins.
    pub tenant_id: Option<TenantId>,
    /// Deactivated actors are denied every operation.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Actor {
    /// Returns true if the actor is bound to the given tenant.
    #[must_use]
    pub fn belongs_to(&self, tenant_id: TenantId) -> bool {
        self.tenant_id == Some(tenant_id)
    }

    /// Returns true if the actor is an active main admin.
    #[must_use]
    pub fn is_main_admin(&self) -> bool {
        self.role == ActorRole::MainAdmin
    }
}

/// Lookup of actors by ID.
///
/// Implementations must read current state on every call; decisions are
/// never made from a cached role.
pub trait ActorDirectory: Send + Sync {
    /// Find an actor by ID.
    fn find_actor(
        &self,
        id: ActorId,
    ) -> impl Future<Output = Result<Option<Actor>, AuthzError>> + Send;
}
