//! Repository implementations for the core ports.
//!
//! Each repository wraps a `DatabaseConnection` and implements one or more
//! traits from `skledger-core`, hiding the `SeaORM` details from the services.

pub mod actor;
pub mod audit_log;
pub mod ledger;
pub mod report;
pub mod tenant;

pub use actor::ActorRepository;
pub use audit_log::AuditLogRepository;
pub use ledger::LedgerRepository;
pub use report::ReportRepository;
pub use tenant::TenantRepository;
