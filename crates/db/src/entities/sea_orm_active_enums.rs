//! Active enums stored as plain strings.
//!
//! The columns are `VARCHAR` rather than native Postgres enums so the
//! lifecycle sweeper can flip values with a plain `UPDATE` and so new
//! variants never require an `ALTER TYPE`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Budget is in effect and accumulates qualifying spend.
    #[sea_orm(string_value = "active")]
    Active,
    /// Budget has expired or been retired by the sweeper.
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// The scope a budget applies to.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum BudgetScope {
    /// One budget across all of the user's accounts (`account_id` is NULL).
    #[sea_orm(string_value = "overall")]
    Overall,
    /// A budget tied to a single account.
    #[sea_orm(string_value = "account")]
    Account,
}

/// Transaction direction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money flowing into an account.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money flowing out of an account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<TransactionKind> for fintrack_core::budget::TransactionKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => Self::Income,
            TransactionKind::Expense => Self::Expense,
        }
    }
}
