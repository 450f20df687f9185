//! Member management service.

use std::future::Future;
use std::sync::Arc;

use serde_json::json;
use skledger_shared::types::{ActorId, TenantId};
use tracing::{info, warn};

use super::error::MemberError;
use super::types::{CreateMemberInput, NewMember};
use crate::audit::{AuditAction, AuditEvent, AuditRecorder};
use crate::authz::{
    Actor, ActorDirectory, AuthzError, DenyReason, Operation, authorize, authorize_actor,
};

const ACTORS_TABLE: &str = "actors";

/// Repository trait for member writes.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait MemberRepository: Send + Sync {
    /// Returns true if the tenant exists.
    fn tenant_exists(
        &self,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<bool, MemberError>> + Send;

    /// Stores a new active actor.
    ///
    /// Returns `MemberError::EmailTaken` if the email is already registered.
    fn insert(&self, member: NewMember) -> impl Future<Output = Result<Actor, MemberError>> + Send;

    /// Marks an actor inactive.
    fn deactivate(&self, id: ActorId) -> impl Future<Output = Result<(), MemberError>> + Send;
}

/// Creates and deletes council members.
pub struct MemberService<R: MemberRepository, D: ActorDirectory> {
    repo: Arc<R>,
    directory: Arc<D>,
    audit: AuditRecorder,
}

impl<R: MemberRepository, D: ActorDirectory> MemberService<R, D> {
    /// Create a new member service.
    #[must_use]
    pub fn new(repo: Arc<R>, directory: Arc<D>, audit: AuditRecorder) -> Self {
        Self {
            repo,
            directory,
            audit,
        }
    }

    /// Creates a member bound to `tenant_id`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput`, `Authz`, `TenantNotFound`, `EmailTaken`, or `Storage`.
    pub async fn create_member(
        &self,
        actor_id: ActorId,
        tenant_id: TenantId,
        input: CreateMemberInput,
    ) -> Result<Actor, MemberError> {
        let member = input.validate(tenant_id)?;

        authorize_actor(
            self.directory.as_ref(),
            actor_id,
            &Operation::CreateMember {
                tenant_id: Some(tenant_id),
                role: member.role,
            },
        )
        .await?;

        if !self.repo.tenant_exists(tenant_id).await? {
            return Err(MemberError::TenantNotFound(tenant_id));
        }

        let created = self.repo.insert(member).await?;

        info!(
            actor_id = %actor_id,
            member_id = %created.id,
            role = %created.role,
            tenant_id = %tenant_id,
            "Member created"
        );

        self.audit.record(
            AuditEvent::new(actor_id, AuditAction::MemberCreate, ACTORS_TABLE)
                .record(created.id)
                .tenant(tenant_id)
                .details(json!({
                    "full_name": created.full_name,
                    "email": created.email,
                    "role": created.role,
                })),
        );

        Ok(created)
    }

    /// Deletes (deactivates) a member.
    ///
    /// The caller is authorized before the target is looked up, so only a
    /// main admin or a chairman of the target's own tenant can tell a
    /// missing member from a forbidden one.
    ///
    /// # Errors
    ///
    /// Returns `MemberNotFound` for unknown or already deleted members,
    /// `Authz` (including self-deletion), or `Storage`.
    pub async fn delete_member(
        &self,
        actor_id: ActorId,
        member_id: ActorId,
    ) -> Result<(), MemberError> {
        let caller =
            authorize_actor(self.directory.as_ref(), actor_id, &Operation::ManageMembers).await?;

        let found = self.directory.find_actor(member_id).await?;
        let visible = caller.is_main_admin()
            || found
                .as_ref()
                .and_then(|a| a.tenant_id)
                .is_some_and(|t| caller.belongs_to(t));
        if !visible {
            warn!(
                actor_id = %actor_id,
                member_id = %member_id,
                reason = DenyReason::OutsideTenant.as_str(),
                "Member deletion denied"
            );
            return Err(AuthzError::Forbidden(DenyReason::OutsideTenant).into());
        }

        let target = found
            .filter(|a| a.is_active)
            .ok_or(MemberError::MemberNotFound(member_id))?;

        authorize(
            &caller,
            &Operation::DeleteMember {
                target: target.id,
                target_role: target.role,
                target_tenant: target.tenant_id,
            },
        )?;

        self.repo.deactivate(member_id).await?;

        info!(
            actor_id = %actor_id,
            member_id = %member_id,
            role = %target.role,
            "Member deleted"
        );

        let mut event = AuditEvent::new(actor_id, AuditAction::MemberDelete, ACTORS_TABLE)
            .record(member_id)
            .details(json!({
                "full_name": target.full_name,
                "role": target.role,
            }));
        if let Some(tenant_id) = target.tenant_id {
            event = event.tenant(tenant_id);
        }
        self.audit.record(event);

        Ok(())
    }
}
