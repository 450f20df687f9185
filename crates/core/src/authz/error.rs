//! Authorization error types.

use thiserror::Error;

/// Why the gate denied an operation.
///
/// The reason is kept for logs and tests; callers only ever see
/// "Access denied".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No actor exists for the session subject.
    UnknownActor,
    /// The actor has been deactivated.
    InactiveActor,
    /// The actor's role never grants this operation.
    RoleNotPermitted,
    /// The actor's role grants it, but only within their own tenant.
    OutsideTenant,
    /// Actors may not delete themselves.
    SelfDeletion,
    /// The resource's lifecycle state does not allow the action.
    InvalidResourceState,
}

impl DenyReason {
    /// Returns a stable identifier for structured logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownActor => "unknown_actor",
            Self::InactiveActor => "inactive_actor",
            Self::RoleNotPermitted => "role_not_permitted",
            Self::OutsideTenant => "outside_tenant",
            Self::SelfDeletion => "self_deletion",
            Self::InvalidResourceState => "invalid_resource_state",
        }
    }
}

/// Authorization errors.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// The operation is not permitted.
    #[error("Access denied")]
    Forbidden(DenyReason),

    /// The actor directory could not be read.
    #[error("Actor lookup failed: {0}")]
    Directory(String),
}

impl AuthzError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Directory(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Forbidden(_) => 403,
            Self::Directory(_) => 500,
        }
    }
}
