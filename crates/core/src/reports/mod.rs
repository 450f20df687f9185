//! Read-only budget reports.
//!
//! This module provides:
//! - Overall totals across tenants
//! - Per-tenant utilization
//! - Monthly spend rollups (deducts only)

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::{
    ReportRepository, ReportService, build_overview, monthly_spend, utilization,
    utilization_percent,
};
pub use types::*;
