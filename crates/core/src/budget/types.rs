//! Budget evaluation data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transaction direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money flowing into an account.
    Income,
    /// Money flowing out of an account. Only expenses count against budgets.
    Expense,
}

/// The scope a budget applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetScope {
    /// One budget across all of a user's accounts.
    Overall,
    /// A budget tied to a single account.
    Account,
}

/// In-memory view of an active budget's accumulated spend and ceiling.
///
/// The evaluator mutates `amount` in place; persisting the new value is the
/// caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetCharge {
    /// The budget row this charge tracks.
    pub budget_id: Uuid,
    /// Accumulated spend so far.
    pub amount: Decimal,
    /// Spending ceiling.
    pub limit: Decimal,
}

impl BudgetCharge {
    /// Returns true once the accumulated spend exceeds the limit.
    #[must_use]
    pub fn is_breached(&self) -> bool {
        self.amount > self.limit
    }
}

/// Signal produced when applying an expense pushes a budget over its limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreachEvent {
    /// User to notify.
    pub user_id: Uuid,
    /// Which budget scope was breached.
    pub scope: BudgetScope,
    /// Human-readable notification message.
    pub message: String,
}
