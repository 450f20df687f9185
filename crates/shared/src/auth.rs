//! Session token claims.
//!
//! Tokens are issued by the portal's identity provider. The ledger only
//! trusts the subject: the actor's role and tenant binding are looked up
//! fresh on every request, never read from the token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ActorId;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (actor ID).
    pub sub: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an actor.
    #[must_use]
    pub fn new(actor_id: ActorId, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: actor_id.into_inner(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the actor ID from claims.
    #[must_use]
    pub const fn actor_id(&self) -> ActorId {
        ActorId::from_uuid(self.sub)
    }
}
