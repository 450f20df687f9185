//! Member management error types.

use skledger_shared::types::{ActorId, TenantId};
use thiserror::Error;

use crate::authz::AuthzError;

/// Errors from creating or deleting members.
#[derive(Debug, Error)]
pub enum MemberError {
    /// A field failed validation.
    #[error("{message}")]
    InvalidInput {
        /// Offending field.
        field: &'static str,
        /// Reason.
        message: &'static str,
    },

    /// Email already belongs to another actor.
    #[error("Email is already registered")]
    EmailTaken,

    /// The caller may not manage this member.
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// Tenant does not exist.
    #[error("Tenant not found: {0}")]
    TenantNotFound(TenantId),

    /// Member does not exist or is already deleted.
    #[error("Member not found: {0}")]
    MemberNotFound(ActorId),

    /// Storage failure.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl MemberError {
    pub(crate) const fn invalid(field: &'static str, message: &'static str) -> Self {
        Self::InvalidInput { field, message }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "VALIDATION_ERROR",
            Self::EmailTaken => "CONFLICT",
            Self::Authz(e) => e.error_code(),
            Self::TenantNotFound(_) | Self::MemberNotFound(_) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidInput { .. } => 400,
            Self::EmailTaken => 409,
            Self::Authz(e) => e.http_status_code(),
            Self::TenantNotFound(_) | Self::MemberNotFound(_) => 404,
            Self::Storage(_) => 500,
        }
    }

    /// Returns the input field a validation error refers to.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidInput { field, .. } => Some(*field),
            Self::EmailTaken => Some("email"),
            _ => None,
        }
    }
}
