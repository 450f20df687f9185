use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;
use skledger_shared::types::{ActorId, TenantId};
use tokio::sync::mpsc;

use super::*;
use crate::audit::{AuditAction, AuditEvent, AuditRecorder};
use crate::authz::testing::{StaticDirectory, actor};
use crate::authz::{Actor, ActorRole, AuthzError, DenyReason};

/// Writes straight into the directory the gate reads from.
struct MemoryMembers {
    directory: Arc<StaticDirectory>,
    tenants: HashSet<TenantId>,
}

impl MemberRepository for MemoryMembers {
    async fn tenant_exists(&self, tenant_id: TenantId) -> Result<bool, MemberError> {
        Ok(self.tenants.contains(&tenant_id))
    }

    async fn insert(&self, member: NewMember) -> Result<Actor, MemberError> {
        if self.directory.has_email(&member.email) {
            return Err(MemberError::EmailTaken);
        }
        let actor = Actor {
            id: member.id,
            full_name: member.full_name,
            email: member.email,
            role: member.role,
            tenant_id: Some(member.tenant_id),
            is_active: true,
            created_at: Utc::now(),
        };
        self.directory.insert(actor.clone());
        Ok(actor)
    }

    async fn deactivate(&self, id: ActorId) -> Result<(), MemberError> {
        let mut actor = self
            .directory
            .get(id)
            .ok_or(MemberError::MemberNotFound(id))?;
        actor.is_active = false;
        self.directory.insert(actor);
        Ok(())
    }
}

struct Harness {
    service: MemberService<MemoryMembers, StaticDirectory>,
    directory: Arc<StaticDirectory>,
    audit_rx: mpsc::Receiver<AuditEvent>,
    tenant: TenantId,
    admin: Actor,
    chairman: Actor,
}

impl Harness {
    fn new() -> Self {
        let tenant = TenantId::new();
        let admin = actor(ActorRole::MainAdmin, None);
        let chairman = actor(ActorRole::SkChairman, Some(tenant));
        let directory = Arc::new(StaticDirectory::with(vec![admin.clone(), chairman.clone()]));
        let repo = Arc::new(MemoryMembers {
            directory: Arc::clone(&directory),
            tenants: HashSet::from([tenant]),
        });
        let (audit, audit_rx) = AuditRecorder::channel(32);

        Self {
            service: MemberService::new(repo, Arc::clone(&directory), audit),
            directory,
            audit_rx,
            tenant,
            admin,
            chairman,
        }
    }

    fn input(role: ActorRole) -> CreateMemberInput {
        CreateMemberInput {
            full_name: "  Maria Clara  ".to_string(),
            email: "Maria.Clara@SK.example".to_string(),
            role,
        }
    }
}

#[tokio::test]
async fn test_chairman_creates_kagawad() {
    let mut h = Harness::new();

    let member = h
        .service
        .create_member(h.chairman.id, h.tenant, Harness::input(ActorRole::Kagawad))
        .await
        .unwrap();

    assert_eq!(member.full_name, "Maria Clara");
    assert_eq!(member.email, "maria.clara@sk.example");
    assert_eq!(member.tenant_id, Some(h.tenant));
    assert!(h.directory.get(member.id).is_some());

    let event = h.audit_rx.try_recv().unwrap();
    assert_eq!(event.action, AuditAction::MemberCreate);
    assert_eq!(event.table_name, "actors");
    assert_eq!(event.record_id, Some(member.id.into()));
    assert_eq!(event.details["role"], "kagawad");
}

#[tokio::test]
async fn test_chairman_cannot_create_chairman() {
    let h = Harness::new();

    let err = h
        .service
        .create_member(h.chairman.id, h.tenant, Harness::input(ActorRole::SkChairman))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MemberError::Authz(AuthzError::Forbidden(DenyReason::RoleNotPermitted))
    ));
}

#[tokio::test]
async fn test_chairman_cannot_create_in_other_tenant() {
    let h = Harness::new();

    let err = h
        .service
        .create_member(h.chairman.id, TenantId::new(), Harness::input(ActorRole::Kagawad))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MemberError::Authz(AuthzError::Forbidden(DenyReason::OutsideTenant))
    ));
}

#[tokio::test]
async fn test_admin_gets_not_found_for_unknown_tenant() {
    let h = Harness::new();
    let missing = TenantId::new();

    let err = h
        .service
        .create_member(h.admin.id, missing, Harness::input(ActorRole::SkChairman))
        .await
        .unwrap_err();

    assert!(matches!(err, MemberError::TenantNotFound(id) if id == missing));
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let h = Harness::new();
    h.service
        .create_member(h.admin.id, h.tenant, Harness::input(ActorRole::Kagawad))
        .await
        .unwrap();

    let err = h
        .service
        .create_member(h.admin.id, h.tenant, Harness::input(ActorRole::SkSecretary))
        .await
        .unwrap_err();

    assert!(matches!(err, MemberError::EmailTaken));
    assert_eq!(err.http_status_code(), 409);
}

#[rstest]
#[case("   ", "someone@sk.example", "full_name")]
#[case("Jose Rizal", "not-an-email", "email")]
#[case("Jose Rizal", "@sk.example", "email")]
#[case("Jose Rizal", "jose@localhost", "email")]
fn test_invalid_input(#[case] full_name: &str, #[case] email: &str, #[case] field: &str) {
    let err = CreateMemberInput {
        full_name: full_name.to_string(),
        email: email.to_string(),
        role: ActorRole::Kagawad,
    }
    .validate(TenantId::new())
    .unwrap_err();

    assert_eq!(err.field(), Some(field));
    assert_eq!(err.http_status_code(), 400);
}

#[test]
fn test_name_length_limit() {
    let err = CreateMemberInput {
        full_name: "a".repeat(MAX_NAME_CHARS + 1),
        email: "long@sk.example".to_string(),
        role: ActorRole::Kagawad,
    }
    .validate(TenantId::new())
    .unwrap_err();

    assert_eq!(err.field(), Some("full_name"));
}

#[tokio::test]
async fn test_delete_deactivates_member() {
    let mut h = Harness::new();
    let kagawad = actor(ActorRole::Kagawad, Some(h.tenant));
    h.directory.insert(kagawad.clone());

    h.service
        .delete_member(h.chairman.id, kagawad.id)
        .await
        .unwrap();

    let stored = h.directory.get(kagawad.id).unwrap();
    assert!(!stored.is_active);

    let event = h.audit_rx.try_recv().unwrap();
    assert_eq!(event.action, AuditAction::MemberDelete);
    assert_eq!(event.tenant_id, Some(h.tenant));

    let err = h
        .service
        .delete_member(h.chairman.id, kagawad.id)
        .await
        .unwrap_err();
    assert!(matches!(err, MemberError::MemberNotFound(_)));
}

#[tokio::test]
async fn test_self_deletion_denied() {
    let h = Harness::new();

    let err = h
        .service
        .delete_member(h.admin.id, h.admin.id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MemberError::Authz(AuthzError::Forbidden(DenyReason::SelfDeletion))
    ));
    assert!(h.directory.get(h.admin.id).unwrap().is_active);
}

#[tokio::test]
async fn test_only_admin_deletes_chairman() {
    let h = Harness::new();
    let peer = actor(ActorRole::SkChairman, Some(h.tenant));
    h.directory.insert(peer.clone());

    assert!(h.service.delete_member(h.chairman.id, peer.id).await.is_err());
    assert!(h.service.delete_member(h.admin.id, peer.id).await.is_ok());
}

#[tokio::test]
async fn test_deleted_member_loses_access() {
    let h = Harness::new();

    h.service
        .delete_member(h.admin.id, h.chairman.id)
        .await
        .unwrap();

    let err = h
        .service
        .create_member(h.chairman.id, h.tenant, Harness::input(ActorRole::Kagawad))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MemberError::Authz(AuthzError::Forbidden(DenyReason::InactiveActor))
    ));
}

#[tokio::test]
async fn test_delete_hides_member_existence_across_tenants() {
    let h = Harness::new();
    let secretary = actor(ActorRole::SkSecretary, Some(h.tenant));
    let other_tenant = TenantId::new();
    let outside_chairman = actor(ActorRole::SkChairman, Some(other_tenant));
    let outside_kagawad = actor(ActorRole::Kagawad, Some(other_tenant));
    h.directory.insert(secretary.clone());
    h.directory.insert(outside_chairman.clone());
    h.directory.insert(outside_kagawad.clone());

    for caller in [outside_chairman.id, outside_kagawad.id, ActorId::new()] {
        let existing = h
            .service
            .delete_member(caller, secretary.id)
            .await
            .unwrap_err();
        let missing = h
            .service
            .delete_member(caller, ActorId::new())
            .await
            .unwrap_err();

        assert!(matches!(existing, MemberError::Authz(AuthzError::Forbidden(_))));
        assert_eq!(existing.to_string(), missing.to_string());
        assert_eq!(existing.http_status_code(), missing.http_status_code());
    }
    assert!(h.directory.get(secretary.id).unwrap().is_active);

    let err = h
        .service
        .delete_member(h.admin.id, ActorId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, MemberError::MemberNotFound(_)));
}
