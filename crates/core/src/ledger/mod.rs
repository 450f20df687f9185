//! Per-tenant budget ledger.
//!
//! This module implements:
//! - Budget account arithmetic (add, deduct, reset)
//! - Transaction input validation
//! - The store port the db crate implements
//! - The transaction processor that ties validation, authorization,
//!   storage, and audit together

pub mod balance;
pub mod error;
pub mod repository;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

pub use error::LedgerError;
pub use repository::LedgerRepository;
pub use service::{LedgerService, ProcessingStage};
pub use types::{
    AccountReset, BudgetAccount, NewTransaction, SubmitTransactionInput, Transaction,
    TransactionType,
};
pub use validation::{MAX_DESCRIPTION_CHARS, normalize_description};
