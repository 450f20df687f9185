//! In-memory actor directory for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use skledger_shared::types::{ActorId, TenantId};

use super::actor::{Actor, ActorDirectory, ActorRole};
use super::error::AuthzError;

/// Actor directory backed by a map; mutable so tests can change roles
/// between calls.
#[derive(Default)]
pub(crate) struct StaticDirectory {
    actors: Mutex<HashMap<ActorId, Actor>>,
}

impl StaticDirectory {
    pub(crate) fn with(actors: Vec<Actor>) -> Self {
        Self {
            actors: Mutex::new(actors.into_iter().map(|a| (a.id, a)).collect()),
        }
    }

    pub(crate) fn insert(&self, actor: Actor) {
        self.actors.lock().unwrap().insert(actor.id, actor);
    }

    pub(crate) fn set_role(&self, id: ActorId, role: ActorRole) {
        if let Some(actor) = self.actors.lock().unwrap().get_mut(&id) {
            actor.role = role;
        }
    }

    pub(crate) fn get(&self, id: ActorId) -> Option<Actor> {
        self.actors.lock().unwrap().get(&id).cloned()
    }

    pub(crate) fn has_email(&self, email: &str) -> bool {
        self.actors
            .lock()
            .unwrap()
            .values()
            .any(|a| a.email == email)
    }
}

impl ActorDirectory for StaticDirectory {
    async fn find_actor(&self, id: ActorId) -> Result<Option<Actor>, AuthzError> {
        Ok(self.get(id))
    }
}

/// Builds an active actor with the given role and tenant binding.
pub(crate) fn actor(role: ActorRole, tenant_id: Option<TenantId>) -> Actor {
    let id = ActorId::new();
    Actor {
        id,
        full_name: format!("{role} {id}"),
        email: format!("{id}@sk.example"),
        role,
        tenant_id,
        is_active: true,
        created_at: Utc::now(),
    }
}
