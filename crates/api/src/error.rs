//! Mapping from domain errors to HTTP responses.
//!
//! Every error body has the shape
//! `{"error": "<snake_code>", "message": "...", "field": "<optional>"}`.
//! Storage faults are logged here and reach the client only as a generic
//! message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use skledger_core::audit::AuditError;
use skledger_core::authz::AuthzError;
use skledger_core::ledger::LedgerError;
use skledger_core::members::MemberError;
use skledger_core::reports::ReportError;
use skledger_core::tenant::TenantError;
use skledger_shared::AppError;
use tracing::error;

const GENERIC_MESSAGE: &str = "An error occurred";

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Lowercase snake error code.
    pub error: String,
    /// Human readable message.
    pub message: String,
    /// Offending input field, for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// An error ready to be rendered as a response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    field: Option<String>,
}

impl ApiError {
    fn new(status: u16, code: &'static str, message: String) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = if status.is_server_error() {
            error!(code, detail = %message, "Request failed");
            GENERIC_MESSAGE.to_string()
        } else {
            message
        };

        Self {
            status,
            code,
            message,
            field: None,
        }
    }

    fn with_field(mut self, field: Option<&str>) -> Self {
        self.field = field.map(str::to_string);
        self
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code.to_ascii_lowercase(),
            message: self.message,
            field: self.field,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AuthzError> for ApiError {
    fn from(e: AuthzError) -> Self {
        // Deny reasons stay in the server log; the caller only learns "forbidden".
        let message = match &e {
            AuthzError::Forbidden(_) => "You are not allowed to perform this action".to_string(),
            AuthzError::Directory(_) => e.to_string(),
        };
        Self::new(e.http_status_code(), e.error_code(), message)
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Authz(inner) => inner.into(),
            other => {
                let field = other.field();
                Self::new(other.http_status_code(), other.error_code(), other.to_string())
                    .with_field(field)
            }
        }
    }
}

impl From<MemberError> for ApiError {
    fn from(e: MemberError) -> Self {
        match e {
            MemberError::Authz(inner) => inner.into(),
            other => {
                let field = other.field();
                Self::new(other.http_status_code(), other.error_code(), other.to_string())
                    .with_field(field)
            }
        }
    }
}

impl From<AuditError> for ApiError {
    fn from(e: AuditError) -> Self {
        match e {
            AuditError::Authz(inner) => inner.into(),
            other => Self::new(other.http_status_code(), other.error_code(), other.to_string()),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Authz(inner) => inner.into(),
            other => Self::new(other.http_status_code(), other.error_code(), other.to_string()),
        }
    }
}

impl From<TenantError> for ApiError {
    fn from(e: TenantError) -> Self {
        match e {
            TenantError::Authz(inner) => inner.into(),
            TenantError::Storage(msg) => Self::new(500, "STORAGE_FAILURE", msg),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        let field = e.field().map(str::to_string);
        let mut api = Self::new(e.status_code(), e.error_code(), e.public_message());
        api.field = field;
        api
    }
}

/// Handler result type.
pub type ApiResult<T> = Result<T, ApiError>;
