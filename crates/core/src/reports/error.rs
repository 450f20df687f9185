//! Report error types.

use thiserror::Error;

use crate::authz::AuthzError;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The caller may not read the report.
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// Storage failure.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Authz(e) => e.error_code(),
            Self::Storage(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Authz(e) => e.http_status_code(),
            Self::Storage(_) => 500,
        }
    }
}
