//! Account repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, Set};
use uuid::Uuid;

use fintrack_shared::types::{PageMeta, PageRequest};

use crate::entities::accounts;
use crate::gate::{self, GateError};
use crate::paginate::paginate;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Lookup or uniqueness gate failure.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account name (unique per user, enforced by the gate).
    pub name: String,
    /// Free-form account type (e.g. "checking", "savings").
    pub account_type: String,
}

/// Input for updating an account. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New account name.
    pub name: Option<String>,
    /// New account type.
    pub account_type: Option<String>,
}

/// Account repository for CRUD operations.
#[derive(Debug)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account with a zero starting balance.
    ///
    /// # Errors
    ///
    /// Returns a conflict if the user already has a non-deleted account
    /// with the same name. The uniqueness check is a read-then-write
    /// inside this request only; there is no backing constraint.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        gate::require_absent::<accounts::Entity, _>(
            &self.db,
            Condition::all()
                .add(accounts::Column::UserId.eq(user_id))
                .add(accounts::Column::Name.eq(&input.name)),
            "Account already exists",
        )
        .await?;

        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(input.name),
            account_type: Set(input.account_type),
            balance: Set(Decimal::ZERO),
            is_active: Set(true),
            is_deleted: Set(false),
            created_at: Set(Utc::now().into()),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Lists the user's accounts, newest first.
    pub async fn list(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<(Vec<accounts::Model>, PageMeta), AccountError> {
        Ok(paginate::<accounts::Entity, _>(
            &self.db,
            Condition::all().add(accounts::Column::UserId.eq(user_id)),
            page,
        )
        .await?)
    }

    /// Fetches a single account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist or is soft-deleted.
    pub async fn get(&self, account_id: Uuid) -> Result<accounts::Model, AccountError> {
        Ok(gate::require_one::<accounts::Entity, _>(
            &self.db,
            Condition::all().add(accounts::Column::Id.eq(account_id)),
            "Account not found",
        )
        .await?)
    }

    /// Updates an account's name and/or type. The balance is never touched
    /// here; only the transaction poster mutates it.
    pub async fn update(
        &self,
        account_id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = self.get(account_id).await?;

        let mut active: accounts::ActiveModel = account.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes an account. Balances and posted transactions are left
    /// as they are.
    pub async fn soft_delete(&self, account_id: Uuid) -> Result<accounts::Model, AccountError> {
        let account = self.get(account_id).await?;

        let mut active: accounts::ActiveModel = account.into();
        active.is_deleted = Set(true);

        Ok(active.update(&self.db).await?)
    }
}
