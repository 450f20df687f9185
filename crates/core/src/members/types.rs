//! Member input types.

use serde::{Deserialize, Serialize};
use skledger_shared::types::{ActorId, TenantId};

use super::error::MemberError;
use crate::authz::ActorRole;

/// Longest accepted full name, in characters.
pub const MAX_NAME_CHARS: usize = 255;

/// Member creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMemberInput {
    /// Display name.
    pub full_name: String,
    /// Contact email, unique across actors.
    pub email: String,
    /// Role to grant.
    pub role: ActorRole,
}

/// A validated member ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    /// Pre-generated actor ID.
    pub id: ActorId,
    /// Trimmed display name.
    pub full_name: String,
    /// Lowercased email.
    pub email: String,
    /// Granted role.
    pub role: ActorRole,
    /// Tenant binding.
    pub tenant_id: TenantId,
}

impl CreateMemberInput {
    /// Trims and checks the input.
    ///
    /// # Errors
    ///
    /// Returns `MemberError::InvalidInput` naming the offending field.
    pub fn validate(self, tenant_id: TenantId) -> Result<NewMember, MemberError> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(MemberError::invalid("full_name", "Full name is required"));
        }
        if full_name.chars().count() > MAX_NAME_CHARS {
            return Err(MemberError::invalid(
                "full_name",
                "Full name must be at most 255 characters",
            ));
        }

        let email = self.email.trim().to_lowercase();
        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(MemberError::invalid("email", "Email is not valid"));
        }

        Ok(NewMember {
            id: ActorId::new(),
            full_name: full_name.to_string(),
            email,
            role: self.role,
            tenant_id,
        })
    }
}
