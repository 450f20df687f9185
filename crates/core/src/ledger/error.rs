//! Ledger error types.

use rust_decimal::Decimal;
use skledger_shared::types::{AmountError, TenantId};
use thiserror::Error;

use crate::authz::AuthzError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount is malformed, non-positive, too precise, or above the ceiling.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Description exceeds the length limit.
    #[error("Description must be at most 500 characters, got {length}")]
    InvalidDescription {
        /// Character count of the rejected description.
        length: usize,
    },

    // ========== Business Rule Errors ==========
    /// Deduct exceeds the available balance.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Requested deduction.
        requested: Decimal,
        /// Available balance at check time.
        available: Decimal,
    },

    /// An add would lift the total budget above `MAX_BALANCE`.
    #[error("Total budget would exceed {limit}")]
    BalanceLimitExceeded {
        /// Largest total an account may hold.
        limit: Decimal,
    },

    // ========== Access Errors ==========
    /// The actor may not perform the operation.
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// Tenant does not exist.
    #[error("Tenant not found: {0}")]
    TenantNotFound(TenantId),

    // ========== Storage Errors ==========
    /// Storage failure.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidDescription { .. } => "INVALID_DESCRIPTION",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::BalanceLimitExceeded { .. } => "INVALID_AMOUNT",
            Self::Authz(e) => e.error_code(),
            Self::TenantNotFound(_) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidAmount(_)
            | Self::InvalidDescription { .. }
            | Self::BalanceLimitExceeded { .. } => 400,

            // 422 Unprocessable Entity - business rule violations
            Self::InsufficientFunds { .. } => 422,

            Self::Authz(e) => e.http_status_code(),
            Self::TenantNotFound(_) => 404,
            Self::Storage(_) => 500,
        }
    }

    /// Returns the input field a validation error refers to.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidAmount(_)
            | Self::InsufficientFunds { .. }
            | Self::BalanceLimitExceeded { .. } => Some("amount"),
            Self::InvalidDescription { .. } => Some("description"),
            _ => None,
        }
    }

    /// Returns true if the error was caused by the request rather than the system.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::Authz(AuthzError::Directory(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::DenyReason;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InvalidAmount(AmountError::NotPositive).error_code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(
            LedgerError::InvalidDescription { length: 501 }.error_code(),
            "INVALID_DESCRIPTION"
        );
        assert_eq!(
            LedgerError::InsufficientFunds {
                requested: dec!(10),
                available: dec!(5),
            }
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            LedgerError::Authz(AuthzError::Forbidden(DenyReason::OutsideTenant)).error_code(),
            "FORBIDDEN"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            LedgerError::InvalidAmount(AmountError::Malformed).http_status_code(),
            400
        );
        assert_eq!(
            LedgerError::InsufficientFunds {
                requested: dec!(10),
                available: dec!(5),
            }
            .http_status_code(),
            422
        );
        assert_eq!(
            LedgerError::Authz(AuthzError::Forbidden(DenyReason::RoleNotPermitted))
                .http_status_code(),
            403
        );
        assert_eq!(
            LedgerError::TenantNotFound(TenantId::new()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::Storage("connection reset".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_fields() {
        assert_eq!(
            LedgerError::InvalidAmount(AmountError::TooManyDecimals).field(),
            Some("amount")
        );
        assert_eq!(
            LedgerError::InvalidDescription { length: 600 }.field(),
            Some("description")
        );
        assert_eq!(LedgerError::Storage(String::new()).field(), None);
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::InsufficientFunds {
            requested: dec!(10000.00),
            available: dec!(749.50),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: requested 10000.00, available 749.50"
        );
    }
}
