//! Core business logic for SK Ledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage is reached through the repository traits each module defines; the
//! db crate implements them.
//!
//! # Modules
//!
//! - `tenant` - Barangay registry
//! - `ledger` - Budget accounts and the add/deduct transaction processor
//! - `authz` - Actor roles and the authorization gate
//! - `audit` - Best-effort audit trail recorder
//! - `reports` - Read-only budget aggregation
//! - `members` - Council member management

pub mod audit;
pub mod authz;
pub mod ledger;
pub mod members;
pub mod reports;
pub mod tenant;
