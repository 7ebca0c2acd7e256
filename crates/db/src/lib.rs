//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - The existence/lookup gate used as the data-access primitive
//! - The generic paginated query helper
//! - Repository abstractions for data access
//! - Database migrations

pub mod entities;
pub mod gate;
pub mod migration;
pub mod paginate;
pub mod repositories;

pub use gate::{Audited, GateError};
pub use repositories::{
    AccountRepository, BudgetRepository, CategoryRepository, NotificationRepository,
    TransactionRepository, UserRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
