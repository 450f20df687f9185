//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Error to response mapping

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use skledger_core::audit::{AuditRecorder, AuditTrail};
use skledger_core::ledger::LedgerService;
use skledger_core::members::MemberService;
use skledger_core::reports::ReportService;
use skledger_core::tenant::TenantRegistry;
use skledger_db::{
    ActorRepository, AuditLogRepository, LedgerRepository, ReportRepository, TenantRepository,
};
use skledger_shared::{JwtService, LedgerConfig};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Ledger service wired to Postgres.
pub type Ledger = LedgerService<LedgerRepository, ActorRepository>;
/// Member service wired to Postgres.
pub type Members = MemberService<ActorRepository, ActorRepository>;
/// Tenant registry wired to Postgres.
pub type Tenants = TenantRegistry<TenantRepository, ActorRepository>;
/// Audit trail reader wired to Postgres.
pub type AuditLog = AuditTrail<AuditLogRepository, ActorRepository>;
/// Report service wired to Postgres.
pub type Reports = ReportService<ReportRepository, ActorRepository>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Tenant lookups.
    pub tenants: Arc<Tenants>,
    /// Budget accounts and transactions.
    pub ledger: Arc<Ledger>,
    /// Council member management.
    pub members: Arc<Members>,
    /// Audit trail reads.
    pub audit_log: Arc<AuditLog>,
    /// Dashboard reports.
    pub reports: Arc<Reports>,
}

impl AppState {
    /// Wires every service to one database connection pool.
    #[must_use]
    pub fn new(
        db: &DatabaseConnection,
        jwt_service: JwtService,
        audit: AuditRecorder,
        ledger_config: &LedgerConfig,
    ) -> Self {
        let actors = Arc::new(ActorRepository::new(db.clone()));

        Self {
            jwt_service: Arc::new(jwt_service),
            tenants: Arc::new(TenantRegistry::new(
                Arc::new(TenantRepository::new(db.clone())),
                Arc::clone(&actors),
            )),
            ledger: Arc::new(LedgerService::new(
                Arc::new(LedgerRepository::new(db.clone())),
                Arc::clone(&actors),
                audit.clone(),
                ledger_config.max_amount,
            )),
            members: Arc::new(MemberService::new(
                Arc::clone(&actors),
                Arc::clone(&actors),
                audit,
            )),
            audit_log: Arc::new(AuditTrail::new(
                Arc::new(AuditLogRepository::new(db.clone())),
                Arc::clone(&actors),
            )),
            reports: Arc::new(ReportService::new(
                Arc::new(ReportRepository::new(db.clone())),
                actors,
            )),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
