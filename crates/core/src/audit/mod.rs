//! Audit trail.
//!
//! Every mutating action is shadowed by an audit entry. Recording is a
//! side channel: it never blocks the action it describes and its failures
//! never reach the caller.

pub mod error;
pub mod recorder;
pub mod service;
pub mod types;


pub use error::AuditError;
pub use recorder::{AuditRecorder, AuditSink, run_worker};
pub use service::{AuditLogStore, AuditTrail};
pub use types::{
    AuditAction, AuditEvent, AuditLogEntry, DEFAULT_ENTRY_LIMIT, ListEntriesQuery,
    MAX_ENTRY_LIMIT,
};
