//! User repository for registration and credential lookup.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, Set};
use uuid::Uuid;

use crate::entities::users;
use crate::gate::{self, GateError};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Lookup or uniqueness gate failure.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// User repository.
#[derive(Debug)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns a conflict if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<users::Model, UserError> {
        gate::require_absent::<users::Entity, _>(
            &self.db,
            Condition::all().add(users::Column::Email.eq(email)),
            "Email already registered",
        )
        .await?;

        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            is_active: Set(true),
            is_deleted: Set(false),
            created_at: Set(Utc::now().into()),
        };

        Ok(user.insert(&self.db).await?)
    }

    /// Finds a non-deleted user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        Ok(gate::find_optional::<users::Entity, _>(
            &self.db,
            Condition::all().add(users::Column::Email.eq(email)),
        )
        .await?)
    }

    /// Finds a non-deleted user by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist or is soft-deleted.
    pub async fn get(&self, user_id: Uuid) -> Result<users::Model, UserError> {
        Ok(gate::require_one::<users::Entity, _>(
            &self.db,
            Condition::all().add(users::Column::Id.eq(user_id)),
            "User not found",
        )
        .await?)
    }
}
