//! Budget-limit evaluation for posted transactions.

pub mod evaluator;
pub mod types;

#[cfg(test)]
mod tests;

pub use evaluator::apply_transaction;
pub use types::{BreachEvent, BudgetCharge, BudgetScope, TransactionKind};
