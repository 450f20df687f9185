//! `SeaORM` active enums mirroring the Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use skledger_core::authz::ActorRole as CoreActorRole;
use skledger_core::ledger::TransactionType as CoreTransactionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "actor_role")]
pub enum ActorRole {
    #[sea_orm(string_value = "main_admin")]
    MainAdmin,
    #[sea_orm(string_value = "sk_chairman")]
    SkChairman,
    #[sea_orm(string_value = "sk_secretary")]
    SkSecretary,
    #[sea_orm(string_value = "kagawad")]
    Kagawad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
pub enum TransactionType {
    #[sea_orm(string_value = "add")]
    Add,
    #[sea_orm(string_value = "deduct")]
    Deduct,
}

impl From<ActorRole> for CoreActorRole {
    fn from(role: ActorRole) -> Self {
        match role {
            ActorRole::MainAdmin => Self::MainAdmin,
            ActorRole::SkChairman => Self::SkChairman,
            ActorRole::SkSecretary => Self::SkSecretary,
            ActorRole::Kagawad => Self::Kagawad,
        }
    }
}

impl From<CoreActorRole> for ActorRole {
    fn from(role: CoreActorRole) -> Self {
        match role {
            CoreActorRole::MainAdmin => Self::MainAdmin,
            CoreActorRole::SkChairman => Self::SkChairman,
            CoreActorRole::SkSecretary => Self::SkSecretary,
            CoreActorRole::Kagawad => Self::Kagawad,
        }
    }
}

impl From<TransactionType> for CoreTransactionType {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Add => Self::Add,
            TransactionType::Deduct => Self::Deduct,
        }
    }
}

impl From<CoreTransactionType> for TransactionType {
    fn from(kind: CoreTransactionType) -> Self {
        match kind {
            CoreTransactionType::Add => Self::Add,
            CoreTransactionType::Deduct => Self::Deduct,
        }
    }
}
