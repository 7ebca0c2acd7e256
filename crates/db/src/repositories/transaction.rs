//! Transaction repository: posting, listing, and soft deletion.
//!
//! Posting is the one multi-step write in the system. It runs inside a
//! single database transaction: reference gates, budget charging, breach
//! notification inserts, the balance mutation, and the transaction row
//! itself all commit or roll back together. Live delivery of breach
//! notifications over WebSocket happens after commit, outside this module.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr, Set,
    TransactionTrait,
};
use uuid::Uuid;

use fintrack_core::budget::{apply_transaction, BreachEvent, BudgetCharge};
use fintrack_shared::types::{PageMeta, PageRequest};

use crate::entities::sea_orm_active_enums::{BudgetScope, BudgetStatus, TransactionKind};
use crate::entities::{accounts, budgets, categories, notifications, sub_categories, transactions};
use crate::gate::{self, GateError};
use crate::paginate::paginate;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Lookup gate failure for a referenced row.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for posting a transaction.
#[derive(Debug, Clone)]
pub struct PostTransactionInput {
    /// Account the money moves in or out of.
    pub account_id: Uuid,
    /// Category the transaction belongs to.
    pub category_id: Uuid,
    /// Optional sub-category refinement.
    pub sub_category_id: Option<Uuid>,
    /// Transaction amount. Not validated for sign; a negative expense
    /// decreases budget spend and increases the balance.
    pub amount: Decimal,
    /// Direction of the money flow.
    pub kind: TransactionKind,
    /// Free-form description.
    pub description: String,
}

/// A committed transaction together with the breaches it triggered.
#[derive(Debug, Clone)]
pub struct PostedTransaction {
    /// The persisted transaction row.
    pub transaction: transactions::Model,
    /// Breach events raised while charging active budgets. The matching
    /// notification rows are already committed; the caller is expected to
    /// push these to any live WebSocket session.
    pub breaches: Vec<BreachEvent>,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by direction.
    pub kind: Option<TransactionKind>,
    /// Restrict to these categories.
    pub category_ids: Option<Vec<Uuid>>,
    /// Restrict to these accounts.
    pub account_ids: Option<Vec<Uuid>>,
    /// Only transactions created at or after this instant.
    pub created_from: Option<DateTime<Utc>>,
    /// Only transactions created at or before this instant.
    pub created_to: Option<DateTime<Utc>>,
}

/// Transaction repository.
#[derive(Debug)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a transaction atomically.
    ///
    /// Gates the referenced sub-category, category, and account, charges
    /// whichever active budgets apply, persists a notification row for
    /// every breach, moves the account balance, and inserts the
    /// transaction row. Everything commits together or not at all.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the sub-category, category, or account is
    /// missing or soft-deleted; nothing is written in that case.
    pub async fn post(
        &self,
        user_id: Uuid,
        input: PostTransactionInput,
    ) -> Result<PostedTransaction, TransactionError> {
        let txn = self.db.begin().await?;
        let posted = Self::post_in(&txn, user_id, input).await?;
        txn.commit().await?;
        Ok(posted)
    }

    async fn post_in(
        txn: &DatabaseTransaction,
        user_id: Uuid,
        input: PostTransactionInput,
    ) -> Result<PostedTransaction, TransactionError> {
        if let Some(sub_category_id) = input.sub_category_id {
            gate::require_one::<sub_categories::Entity, _>(
                txn,
                Condition::all().add(sub_categories::Column::Id.eq(sub_category_id)),
                "Subcategory not found",
            )
            .await?;
        }

        gate::require_one::<categories::Entity, _>(
            txn,
            Condition::all().add(categories::Column::Id.eq(input.category_id)),
            "Category not found",
        )
        .await?;

        let account = gate::require_one::<accounts::Entity, _>(
            txn,
            Condition::all().add(accounts::Column::Id.eq(input.account_id)),
            "Account not found",
        )
        .await?;
        let account_name = account.name.clone();

        let overall_budget = gate::find_optional::<budgets::Entity, _>(
            txn,
            Condition::all()
                .add(budgets::Column::UserId.eq(user_id))
                .add(budgets::Column::Status.eq(BudgetStatus::Active))
                .add(budgets::Column::Scope.eq(BudgetScope::Overall)),
        )
        .await?;

        let account_budget = gate::find_optional::<budgets::Entity, _>(
            txn,
            Condition::all()
                .add(budgets::Column::UserId.eq(user_id))
                .add(budgets::Column::AccountId.eq(input.account_id))
                .add(budgets::Column::Status.eq(BudgetStatus::Active))
                .add(budgets::Column::Scope.eq(BudgetScope::Account)),
        )
        .await?;

        let mut overall_charge = overall_budget.as_ref().map(charge_of);
        let mut account_charge = account_budget.as_ref().map(charge_of);

        let breaches = apply_transaction(
            user_id,
            input.amount,
            input.kind.clone().into(),
            overall_charge.as_mut(),
            account_charge
                .as_mut()
                .map(|charge| (charge, account_name.as_str())),
        );

        for (budget, charge) in [
            (overall_budget, overall_charge),
            (account_budget, account_charge),
        ] {
            if let (Some(budget), Some(charge)) = (budget, charge) {
                // Income leaves charges untouched; skip the no-op write.
                if charge.amount != budget.amount {
                    let mut active: budgets::ActiveModel = budget.into();
                    active.amount = Set(charge.amount);
                    active.update(txn).await?;
                }
            }
        }

        for breach in &breaches {
            let notification = notifications::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(breach.user_id),
                message: Set(breach.message.clone()),
                is_read: Set(false),
                is_active: Set(true),
                is_deleted: Set(false),
                created_at: Set(Utc::now().into()),
            };
            notification.insert(txn).await?;
        }

        let new_balance = match input.kind {
            TransactionKind::Income => account.balance + input.amount,
            TransactionKind::Expense => account.balance - input.amount,
        };
        let mut account_active: accounts::ActiveModel = account.into();
        account_active.balance = Set(new_balance);
        account_active.update(txn).await?;

        let now = Utc::now();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            account_id: Set(input.account_id),
            category_id: Set(input.category_id),
            sub_category_id: Set(input.sub_category_id),
            amount: Set(input.amount),
            kind: Set(input.kind),
            description: Set(input.description),
            transaction_time: Set(now.into()),
            is_active: Set(true),
            is_deleted: Set(false),
            created_at: Set(now.into()),
        };
        let transaction = transaction.insert(txn).await?;

        Ok(PostedTransaction {
            transaction,
            breaches,
        })
    }

    /// Lists the user's transactions with optional filters, newest first.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: TransactionFilter,
        page: &PageRequest,
    ) -> Result<(Vec<transactions::Model>, PageMeta), TransactionError> {
        let mut condition = Condition::all().add(transactions::Column::UserId.eq(user_id));

        if let Some(kind) = filter.kind {
            condition = condition.add(transactions::Column::Kind.eq(kind));
        }
        if let Some(category_ids) = filter.category_ids {
            condition = condition.add(transactions::Column::CategoryId.is_in(category_ids));
        }
        if let Some(account_ids) = filter.account_ids {
            condition = condition.add(transactions::Column::AccountId.is_in(account_ids));
        }
        if let Some(from) = filter.created_from {
            condition = condition.add(transactions::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.created_to {
            condition = condition.add(transactions::Column::CreatedAt.lte(to));
        }

        Ok(paginate::<transactions::Entity, _>(&self.db, condition, page).await?)
    }

    /// Fetches a single transaction by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transaction does not exist or is
    /// soft-deleted.
    pub async fn get(&self, transaction_id: Uuid) -> Result<transactions::Model, TransactionError> {
        Ok(gate::require_one::<transactions::Entity, _>(
            &self.db,
            Condition::all().add(transactions::Column::Id.eq(transaction_id)),
            "Transaction not found",
        )
        .await?)
    }

    /// Soft-deletes a transaction.
    ///
    /// The account balance and any budget charges it caused are NOT
    /// reversed; the row just disappears from listings.
    pub async fn soft_delete(
        &self,
        transaction_id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        let transaction = self.get(transaction_id).await?;

        let mut active: transactions::ActiveModel = transaction.into();
        active.is_deleted = Set(true);

        Ok(active.update(&self.db).await?)
    }
}

fn charge_of(budget: &budgets::Model) -> BudgetCharge {
    BudgetCharge {
        budget_id: budget.id,
        amount: budget.amount,
        limit: budget.limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn category(user_id: Uuid) -> categories::Model {
        categories::Model {
            id: Uuid::new_v4(),
            user_id,
            name: "Food".to_string(),
            description: "Groceries and dining".to_string(),
            is_active: true,
            is_deleted: false,
            created_at: Utc::now().into(),
        }
    }

    fn account(user_id: Uuid, balance: Decimal) -> accounts::Model {
        accounts::Model {
            id: Uuid::new_v4(),
            user_id,
            name: "Checking".to_string(),
            account_type: "checking".to_string(),
            balance,
            is_active: true,
            is_deleted: false,
            created_at: Utc::now().into(),
        }
    }

    fn budget(
        user_id: Uuid,
        account_id: Option<Uuid>,
        scope: BudgetScope,
        amount: Decimal,
        limit: Decimal,
    ) -> budgets::Model {
        budgets::Model {
            id: Uuid::new_v4(),
            user_id,
            account_id,
            amount,
            limit,
            status: BudgetStatus::Active,
            scope,
            start_date: Utc::now().into(),
            end_date: Utc::now().into(),
            is_active: true,
            is_deleted: false,
            created_at: Utc::now().into(),
        }
    }

    fn posted(
        user_id: Uuid,
        account_id: Uuid,
        category_id: Uuid,
        amount: Decimal,
        kind: TransactionKind,
    ) -> transactions::Model {
        transactions::Model {
            id: Uuid::new_v4(),
            user_id,
            account_id,
            category_id,
            sub_category_id: None,
            amount,
            kind,
            description: "lunch".to_string(),
            transaction_time: Utc::now().into(),
            is_active: true,
            is_deleted: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_post_without_budgets_commits_and_raises_nothing() {
        let user_id = Uuid::new_v4();
        let cat = category(user_id);
        let acc = account(user_id, dec!(100));
        let mut updated_acc = acc.clone();
        updated_acc.balance = dec!(75);
        let row = posted(user_id, acc.id, cat.id, dec!(25), TransactionKind::Expense);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cat.clone()]])
            .append_query_results([vec![acc.clone()]])
            .append_query_results([Vec::<budgets::Model>::new()])
            .append_query_results([Vec::<budgets::Model>::new()])
            .append_query_results([vec![updated_acc]])
            .append_query_results([vec![row.clone()]])
            .into_connection();

        let repo = TransactionRepository::new(db);
        let result = repo
            .post(
                user_id,
                PostTransactionInput {
                    account_id: acc.id,
                    category_id: cat.id,
                    sub_category_id: None,
                    amount: dec!(25),
                    kind: TransactionKind::Expense,
                    description: "lunch".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(result.breaches.is_empty());
        assert_eq!(result.transaction, row);
    }

    #[tokio::test]
    async fn test_post_rejects_missing_category() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<categories::Model>::new()])
            .into_connection();

        let repo = TransactionRepository::new(db);
        let err = repo
            .post(
                user_id,
                PostTransactionInput {
                    account_id: Uuid::new_v4(),
                    category_id: Uuid::new_v4(),
                    sub_category_id: None,
                    amount: dec!(10),
                    kind: TransactionKind::Expense,
                    description: "x".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TransactionError::Gate(GateError::NotFound(msg)) if msg == "Category not found"
        ));
    }

    #[tokio::test]
    async fn test_post_expense_over_limit_raises_breach() {
        let user_id = Uuid::new_v4();
        let cat = category(user_id);
        let acc = account(user_id, dec!(500));
        let overall = budget(user_id, None, BudgetScope::Overall, dec!(90), dec!(100));

        let mut updated_budget = overall.clone();
        updated_budget.amount = dec!(140);
        let notification = notifications::Model {
            id: Uuid::new_v4(),
            user_id,
            message: "Budget limit exceeded for overall budget".to_string(),
            is_read: false,
            is_active: true,
            is_deleted: false,
            created_at: Utc::now().into(),
        };
        let mut updated_acc = acc.clone();
        updated_acc.balance = dec!(450);
        let row = posted(user_id, acc.id, cat.id, dec!(50), TransactionKind::Expense);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cat.clone()]])
            .append_query_results([vec![acc.clone()]])
            .append_query_results([vec![overall]])
            .append_query_results([Vec::<budgets::Model>::new()])
            .append_query_results([vec![updated_budget]])
            .append_query_results([vec![notification]])
            .append_query_results([vec![updated_acc]])
            .append_query_results([vec![row]])
            .into_connection();

        let repo = TransactionRepository::new(db);
        let result = repo
            .post(
                user_id,
                PostTransactionInput {
                    account_id: acc.id,
                    category_id: cat.id,
                    sub_category_id: None,
                    amount: dec!(50),
                    kind: TransactionKind::Expense,
                    description: "shoes".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.breaches.len(), 1);
        assert_eq!(
            result.breaches[0].message,
            "Budget limit exceeded for overall budget"
        );
    }

    #[tokio::test]
    async fn test_post_income_skips_budgets() {
        let user_id = Uuid::new_v4();
        let cat = category(user_id);
        let acc = account(user_id, dec!(100));
        let overall = budget(user_id, None, BudgetScope::Overall, dec!(0), dec!(10));
        let mut updated_acc = acc.clone();
        updated_acc.balance = dec!(300);
        let row = posted(user_id, acc.id, cat.id, dec!(200), TransactionKind::Income);

        // Budgets are fetched but never written: income does not charge.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cat.clone()]])
            .append_query_results([vec![acc.clone()]])
            .append_query_results([vec![overall]])
            .append_query_results([Vec::<budgets::Model>::new()])
            .append_query_results([vec![updated_acc]])
            .append_query_results([vec![row]])
            .into_connection();

        let repo = TransactionRepository::new(db);
        let result = repo
            .post(
                user_id,
                PostTransactionInput {
                    account_id: acc.id,
                    category_id: cat.id,
                    sub_category_id: None,
                    amount: dec!(200),
                    kind: TransactionKind::Income,
                    description: "salary".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(result.breaches.is_empty());
    }
}
