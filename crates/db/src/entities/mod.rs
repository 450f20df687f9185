//! `SeaORM` entity definitions.

pub mod actors;
pub mod audit_logs;
pub mod budget_accounts;
pub mod sea_orm_active_enums;
pub mod tenants;
pub mod transactions;
