//! Actor repository for database operations.
//!
//! Backs both the authorization directory and member management. Lookups
//! always hit the database so role changes take effect on the next request.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};
use skledger_core::authz::{Actor, ActorDirectory, ActorRole as CoreActorRole, AuthzError};
use skledger_core::members::{MemberError, MemberRepository, NewMember};
use skledger_shared::types::{ActorId, TenantId};

use crate::entities::{actors, sea_orm_active_enums::ActorRole, tenants};

/// Actor lookups and member writes.
#[derive(Debug, Clone)]
pub struct ActorRepository {
    db: DatabaseConnection,
}

impl ActorRepository {
    /// Creates a new actor repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an actor by email, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Actor>, DbErr> {
        let model = actors::Entity::find()
            .filter(actors::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await?;

        Ok(model.map(to_domain))
    }

    /// Inserts an actor directly, bypassing authorization.
    ///
    /// Used by provisioning to create main admins.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn provision(
        &self,
        full_name: &str,
        email: &str,
        role: CoreActorRole,
        tenant_id: Option<TenantId>,
    ) -> Result<Actor, DbErr> {
        let now = Utc::now();
        let model = actors::ActiveModel {
            id: Set(ActorId::new().into_inner()),
            full_name: Set(full_name.to_string()),
            email: Set(email.to_lowercase()),
            role: Set(ActorRole::from(role)),
            tenant_id: Set(tenant_id.map(TenantId::into_inner)),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;

        Ok(to_domain(model))
    }
}

impl ActorDirectory for ActorRepository {
    async fn find_actor(&self, id: ActorId) -> Result<Option<Actor>, AuthzError> {
        let model = actors::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| AuthzError::Directory(e.to_string()))?;

        Ok(model.map(to_domain))
    }
}

impl MemberRepository for ActorRepository {
    async fn tenant_exists(&self, tenant_id: TenantId) -> Result<bool, MemberError> {
        let count = tenants::Entity::find_by_id(tenant_id.into_inner())
            .count(&self.db)
            .await
            .map_err(|e| MemberError::Storage(e.to_string()))?;

        Ok(count > 0)
    }

    async fn insert(&self, member: NewMember) -> Result<Actor, MemberError> {
        let now = Utc::now();
        let result = actors::ActiveModel {
            id: Set(member.id.into_inner()),
            full_name: Set(member.full_name),
            email: Set(member.email),
            role: Set(member.role.into()),
            tenant_id: Set(Some(member.tenant_id.into_inner())),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(model) => Ok(to_domain(model)),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(MemberError::EmailTaken),
                _ => Err(MemberError::Storage(e.to_string())),
            },
        }
    }

    async fn deactivate(&self, id: ActorId) -> Result<(), MemberError> {
        let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();
        let result = actors::Entity::update_many()
            .col_expr(actors::Column::IsActive, Expr::value(false))
            .col_expr(actors::Column::UpdatedAt, Expr::value(now))
            .filter(actors::Column::Id.eq(id.into_inner()))
            .filter(actors::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| MemberError::Storage(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(MemberError::MemberNotFound(id));
        }
        Ok(())
    }
}

pub(crate) fn to_domain(model: actors::Model) -> Actor {
    Actor {
        id: ActorId::from_uuid(model.id),
        full_name: model.full_name,
        email: model.email,
        role: model.role.into(),
        tenant_id: model.tenant_id.map(TenantId::from_uuid),
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
