//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! All lookups go through the existence gate in [`crate::gate`], so
//! soft-deleted rows are invisible everywhere.

pub mod account;
pub mod budget;
pub mod category;
pub mod notification;
pub mod transaction;
pub mod user;

pub use account::{AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput};
pub use budget::{
    BudgetError, BudgetFilter, BudgetRepository, CreateBudgetInput, UpdateBudgetInput,
};
pub use category::{CategoryError, CategoryInput, CategoryRepository};
pub use notification::{NotificationError, NotificationRepository};
pub use transaction::{
    PostTransactionInput, PostedTransaction, TransactionError, TransactionFilter,
    TransactionRepository,
};
pub use user::{UserError, UserRepository};
