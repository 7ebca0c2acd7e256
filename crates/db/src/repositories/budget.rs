//! Budget repository.
//!
//! Enforces the one-active-budget-per-scope invariant through the
//! existence gate: a read-then-conditionally-write check inside a single
//! request's session. Two truly concurrent creation requests for the same
//! scope can both pass the check; there is deliberately no unique
//! constraint backing it at the storage layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use fintrack_shared::types::{PageMeta, PageRequest};

use crate::entities::sea_orm_active_enums::{BudgetScope, BudgetStatus};
use crate::entities::budgets;
use crate::gate::{self, GateError};
use crate::paginate::paginate;

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Lookup or uniqueness gate failure.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Spending ceiling.
    pub limit: Decimal,
    /// When the budget takes effect.
    pub start_date: DateTime<Utc>,
    /// When the budget expires (the sweeper flips it to inactive).
    pub end_date: DateTime<Utc>,
}

/// Input for updating a budget. `None` fields are left unchanged.
///
/// The accumulated `amount` is never updatable: only qualifying expense
/// transactions increase it, and nothing decreases it.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    /// New spending ceiling.
    pub limit: Option<Decimal>,
    /// New start date.
    pub start_date: Option<DateTime<Utc>>,
    /// New end date.
    pub end_date: Option<DateTime<Utc>>,
    /// New lifecycle status.
    pub status: Option<BudgetStatus>,
}

/// Filter options for listing budgets.
#[derive(Debug, Clone, Default)]
pub struct BudgetFilter {
    /// Filter by lifecycle status.
    pub status: Option<BudgetStatus>,
    /// Filter by scope.
    pub scope: Option<BudgetScope>,
    /// Filter by account.
    pub account_id: Option<Uuid>,
    /// Only budgets created at or after this instant.
    pub created_from: Option<DateTime<Utc>>,
    /// Only budgets created at or before this instant.
    pub created_to: Option<DateTime<Utc>>,
}

/// Budget repository for CRUD operations and the lifecycle sweep.
#[derive(Debug)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the user's overall budget.
    ///
    /// # Errors
    ///
    /// Returns a conflict if the user already has an active overall
    /// budget.
    pub async fn create_overall(
        &self,
        user_id: Uuid,
        input: CreateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        gate::require_absent::<budgets::Entity, _>(
            &self.db,
            Condition::all()
                .add(budgets::Column::UserId.eq(user_id))
                .add(budgets::Column::Status.eq(BudgetStatus::Active))
                .add(budgets::Column::Scope.eq(BudgetScope::Overall)),
            "Budget already exists",
        )
        .await?;

        self.insert(user_id, None, BudgetScope::Overall, input).await
    }

    /// Creates an account-scoped budget.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist, or a conflict if
    /// the account already has an active budget.
    pub async fn create_for_account(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        input: CreateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        use crate::entities::accounts;

        gate::require_one::<accounts::Entity, _>(
            &self.db,
            Condition::all().add(accounts::Column::Id.eq(account_id)),
            "Account doesn't exist",
        )
        .await?;

        gate::require_absent::<budgets::Entity, _>(
            &self.db,
            Condition::all()
                .add(budgets::Column::UserId.eq(user_id))
                .add(budgets::Column::AccountId.eq(account_id))
                .add(budgets::Column::Status.eq(BudgetStatus::Active))
                .add(budgets::Column::Scope.eq(BudgetScope::Account)),
            "Budget already exists",
        )
        .await?;

        self.insert(user_id, Some(account_id), BudgetScope::Account, input)
            .await
    }

    async fn insert(
        &self,
        user_id: Uuid,
        account_id: Option<Uuid>,
        scope: BudgetScope,
        input: CreateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        let budget = budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            account_id: Set(account_id),
            amount: Set(Decimal::ZERO),
            limit: Set(input.limit),
            status: Set(BudgetStatus::Active),
            scope: Set(scope),
            start_date: Set(input.start_date.into()),
            end_date: Set(input.end_date.into()),
            is_active: Set(true),
            is_deleted: Set(false),
            created_at: Set(Utc::now().into()),
        };

        Ok(budget.insert(&self.db).await?)
    }

    /// Lists the user's budgets with optional filters, newest first.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: BudgetFilter,
        page: &PageRequest,
    ) -> Result<(Vec<budgets::Model>, PageMeta), BudgetError> {
        let mut condition = Condition::all().add(budgets::Column::UserId.eq(user_id));

        if let Some(status) = filter.status {
            condition = condition.add(budgets::Column::Status.eq(status));
        }
        if let Some(scope) = filter.scope {
            condition = condition.add(budgets::Column::Scope.eq(scope));
        }
        if let Some(account_id) = filter.account_id {
            condition = condition.add(budgets::Column::AccountId.eq(account_id));
        }
        if let Some(from) = filter.created_from {
            condition = condition.add(budgets::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.created_to {
            condition = condition.add(budgets::Column::CreatedAt.lte(to));
        }

        Ok(paginate::<budgets::Entity, _>(&self.db, condition, page).await?)
    }

    /// Fetches a single budget.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the budget does not exist or is soft-deleted.
    pub async fn get(&self, budget_id: Uuid) -> Result<budgets::Model, BudgetError> {
        Ok(gate::require_one::<budgets::Entity, _>(
            &self.db,
            Condition::all().add(budgets::Column::Id.eq(budget_id)),
            "Budget not found",
        )
        .await?)
    }

    /// Updates a budget's limit, dates, and/or status.
    pub async fn update(
        &self,
        budget_id: Uuid,
        input: UpdateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        let budget = self.get(budget_id).await?;

        let mut active: budgets::ActiveModel = budget.into();
        if let Some(limit) = input.limit {
            active.limit = Set(limit);
        }
        if let Some(start_date) = input.start_date {
            active.start_date = Set(start_date.into());
        }
        if let Some(end_date) = input.end_date {
            active.end_date = Set(end_date.into());
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes a budget.
    pub async fn soft_delete(&self, budget_id: Uuid) -> Result<budgets::Model, BudgetError> {
        let budget = self.get(budget_id).await?;

        let mut active: budgets::ActiveModel = budget.into();
        active.is_deleted = Set(true);

        Ok(active.update(&self.db).await?)
    }

    /// Flips every non-deleted budget whose end date has passed to
    /// inactive, as one batch. Idempotent: already-inactive rows are a
    /// no-op. Returns the number of rows touched.
    pub async fn deactivate_expired(&self) -> Result<u64, BudgetError> {
        let result = budgets::Entity::update_many()
            .col_expr(
                budgets::Column::Status,
                Expr::value(BudgetStatus::Inactive),
            )
            .filter(budgets::Column::EndDate.lte(Utc::now()))
            .filter(budgets::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_deactivate_expired_reports_rows_touched() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .into_connection();

        let repo = BudgetRepository::new(db);
        let touched = repo.deactivate_expired().await.unwrap();
        assert_eq!(touched, 3);
    }

    #[tokio::test]
    async fn test_deactivate_expired_is_noop_when_nothing_expired() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = BudgetRepository::new(db);
        assert_eq!(repo.deactivate_expired().await.unwrap(), 0);
    }
}
