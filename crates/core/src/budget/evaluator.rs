//! Pure budget-limit evaluation.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{BreachEvent, BudgetCharge, BudgetScope, TransactionKind};

/// Applies a transaction to the user's active budgets and collects breaches.
///
/// Expenses increase the accumulated `amount` of whichever active budgets
/// are present (overall and/or account-scoped); income never touches a
/// budget. A breach event is emitted for every scope whose new amount
/// exceeds its limit on this call. Breaches are deliberately not
/// deduplicated across calls: a budget that is already over its limit
/// breaches again on the next qualifying expense.
///
/// Mutation happens in place; persisting the updated charges is the
/// caller's job.
pub fn apply_transaction(
    user_id: Uuid,
    amount: Decimal,
    kind: TransactionKind,
    overall: Option<&mut BudgetCharge>,
    account: Option<(&mut BudgetCharge, &str)>,
) -> Vec<BreachEvent> {
    if kind == TransactionKind::Income {
        return Vec::new();
    }

    let mut breaches = Vec::with_capacity(2);

    if let Some(charge) = overall {
        charge.amount += amount;
        if charge.is_breached() {
            breaches.push(BreachEvent {
                user_id,
                scope: BudgetScope::Overall,
                message: "Budget limit exceeded for overall budget".to_string(),
            });
        }
    }

    if let Some((charge, account_name)) = account {
        charge.amount += amount;
        if charge.is_breached() {
            breaches.push(BreachEvent {
                user_id,
                scope: BudgetScope::Account,
                message: format!("Budget limit exceeded for account {account_name}"),
            });
        }
    }

    breaches
}
