//! The authorization gate.
//!
//! | Operation | Allowed |
//! |---|---|
//! | add/deduct on tenant T | main_admin; sk_chairman of T |
//! | reset(T) / reset all | main_admin |
//! | create/delete secretary or kagawad in T | main_admin; sk_chairman of T |
//! | create/delete sk_chairman | main_admin |
//! | archive/restore/hard-delete a tenant resource | creator or main_admin; hard delete only when archived |
//! | self-deletion | nobody |
//!
//! Reads: any active actor may list tenants; tenant-scoped reads are open to
//! main_admin and actors bound to that tenant; the audit log and overall
//! reports are main_admin only.

use skledger_shared::types::{ActorId, TenantId};
use tracing::warn;

use super::actor::{Actor, ActorDirectory, ActorRole};
use super::error::{AuthzError, DenyReason};

/// Lifecycle state of a tenant-scoped resource (announcement, project, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// Visible and editable.
    Active,
    /// Hidden, restorable, and eligible for hard deletion.
    Archived,
}

/// Lifecycle action on a tenant-scoped resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    /// Active → Archived.
    Archive,
    /// Archived → Active.
    Restore,
    /// Permanent removal of an archived resource.
    HardDelete,
}

impl ResourceAction {
    const fn allowed_from(self) -> ResourceState {
        match self {
            Self::Archive => ResourceState::Active,
            Self::Restore | Self::HardDelete => ResourceState::Archived,
        }
    }
}

/// The parts of a resource the gate needs to decide on lifecycle actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRef {
    /// Actor that created the resource.
    pub created_by: ActorId,
    /// Owning tenant, if any.
    pub tenant_id: Option<TenantId>,
    /// Current lifecycle state.
    pub state: ResourceState,
}

/// Everything the gate can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// List the tenant directory.
    ListTenants,
    /// Read one tenant's budget and transaction history.
    ViewTenant(TenantId),
    /// Add to or deduct from one tenant's budget.
    MutateBudget(TenantId),
    /// Zero one tenant's balances.
    ResetBudget(TenantId),
    /// Zero every tenant's balances.
    ResetAllBudgets,
    /// Read the audit trail.
    ViewAuditLog,
    /// Read cross-tenant reports.
    ViewOverallReports,
    /// Create a council member.
    CreateMember {
        /// Tenant the new member is bound to.
        tenant_id: Option<TenantId>,
        /// Role the new member receives.
        role: ActorRole,
    },
    /// Hold any member-management role, before a target is known.
    ManageMembers,
    /// Delete (deactivate) a council member.
    DeleteMember {
        /// The member being deleted.
        target: ActorId,
        /// The member's current role.
        target_role: ActorRole,
        /// The member's tenant binding.
        target_tenant: Option<TenantId>,
    },
    /// Archive, restore, or hard-delete a tenant-scoped resource.
    ManageResource {
        /// Requested lifecycle action.
        action: ResourceAction,
        /// The resource.
        resource: ResourceRef,
    },
}

impl Operation {
    /// Returns a stable name for structured logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ListTenants => "list_tenants",
            Self::ViewTenant(_) => "view_tenant",
            Self::MutateBudget(_) => "mutate_budget",
            Self::ResetBudget(_) => "reset_budget",
            Self::ResetAllBudgets => "reset_all_budgets",
            Self::ViewAuditLog => "view_audit_log",
            Self::ViewOverallReports => "view_overall_reports",
            Self::CreateMember { .. } => "create_member",
            Self::ManageMembers => "manage_members",
            Self::DeleteMember { .. } => "delete_member",
            Self::ManageResource { .. } => "manage_resource",
        }
    }
}

/// Decides whether an already resolved `actor` may perform `operation`.
///
/// # Errors
///
/// Returns `AuthzError::Forbidden` with the deny reason.
pub fn authorize(actor: &Actor, operation: &Operation) -> Result<(), AuthzError> {
    decide(actor, operation).map_err(|reason| denied(actor, operation, reason))
}

fn denied(actor: &Actor, operation: &Operation, reason: DenyReason) -> AuthzError {
    warn!(
        actor_id = %actor.id,
        role = %actor.role,
        operation = operation.name(),
        reason = reason.as_str(),
        "Authorization denied"
    );
    AuthzError::Forbidden(reason)
}

fn decide(actor: &Actor, operation: &Operation) -> Result<(), DenyReason> {
    if !actor.is_active {
        return Err(DenyReason::InactiveActor);
    }

    match *operation {
        Operation::ListTenants => Ok(()),
        Operation::ViewTenant(tenant_id) => {
            if actor.is_main_admin() || actor.belongs_to(tenant_id) {
                Ok(())
            } else {
                Err(DenyReason::OutsideTenant)
            }
        }
        Operation::MutateBudget(tenant_id) => chairman_of(actor, Some(tenant_id)),
        Operation::ResetBudget(_)
        | Operation::ResetAllBudgets
        | Operation::ViewAuditLog
        | Operation::ViewOverallReports => main_admin_only(actor),
        Operation::CreateMember { tenant_id, role } => manage_member(actor, role, tenant_id),
        Operation::ManageMembers => match actor.role {
            ActorRole::MainAdmin | ActorRole::SkChairman => Ok(()),
            ActorRole::SkSecretary | ActorRole::Kagawad => Err(DenyReason::RoleNotPermitted),
        },
        Operation::DeleteMember {
            target,
            target_role,
            target_tenant,
        } => {
            if target == actor.id {
                return Err(DenyReason::SelfDeletion);
            }
            manage_member(actor, target_role, target_tenant)
        }
        Operation::ManageResource { action, resource } => {
            if !actor.is_main_admin() && resource.created_by != actor.id {
                return Err(DenyReason::RoleNotPermitted);
            }
            if resource.state != action.allowed_from() {
                return Err(DenyReason::InvalidResourceState);
            }
            Ok(())
        }
    }
}

fn main_admin_only(actor: &Actor) -> Result<(), DenyReason> {
    if actor.is_main_admin() {
        Ok(())
    } else {
        Err(DenyReason::RoleNotPermitted)
    }
}

/// Main admin anywhere, or a chairman inside their own tenant.
fn chairman_of(actor: &Actor, tenant_id: Option<TenantId>) -> Result<(), DenyReason> {
    match actor.role {
        ActorRole::MainAdmin => Ok(()),
        ActorRole::SkChairman => match tenant_id {
            Some(t) if actor.belongs_to(t) => Ok(()),
            _ => Err(DenyReason::OutsideTenant),
        },
        ActorRole::SkSecretary | ActorRole::Kagawad => Err(DenyReason::RoleNotPermitted),
    }
}

fn manage_member(
    actor: &Actor,
    member_role: ActorRole,
    tenant_id: Option<TenantId>,
) -> Result<(), DenyReason> {
    match member_role {
        ActorRole::SkSecretary | ActorRole::Kagawad => chairman_of(actor, tenant_id),
        ActorRole::SkChairman => main_admin_only(actor),
        // Main admins are provisioned outside the portal.
        ActorRole::MainAdmin => Err(DenyReason::RoleNotPermitted),
    }
}

/// Resolves the actor fresh from the directory and authorizes the operation.
///
/// Returns the resolved actor so callers can record who acted.
///
/// # Errors
///
/// Returns `AuthzError::Forbidden` for unknown, inactive, or unauthorized
/// actors, and `AuthzError::Directory` if the lookup itself fails.
pub async fn authorize_actor<D: ActorDirectory>(
    directory: &D,
    actor_id: ActorId,
    operation: &Operation,
) -> Result<Actor, AuthzError> {
    let Some(actor) = directory.find_actor(actor_id).await? else {
        warn!(
            actor_id = %actor_id,
            operation = operation.name(),
            reason = DenyReason::UnknownActor.as_str(),
            "Authorization denied"
        );
        return Err(AuthzError::Forbidden(DenyReason::UnknownActor));
    };

    authorize(&actor, operation)?;
    Ok(actor)
}
