//! Existence/lookup gate.
//!
//! The single data-access primitive used by every repository: given a
//! predicate over one entity type, either require that a matching
//! non-deleted row exists (returning it), require that none exists
//! (rejecting when one does), or look it up optionally. Soft-deleted rows
//! are always excluded.

use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Select};
use thiserror::Error;

use fintrack_shared::AppError;

/// Entities carrying the common audit columns.
///
/// Implemented for every entity in [`crate::entities`]; lets the gate and
/// the paginator filter soft-deleted rows and order by creation time
/// without knowing the concrete table.
pub trait Audited: EntityTrait {
    /// The `is_deleted` column.
    fn is_deleted_col() -> Self::Column;

    /// The `created_at` column.
    fn created_at_col() -> Self::Column;
}

/// Error types for gate operations.
#[derive(Debug, Error)]
pub enum GateError {
    /// No matching non-deleted row.
    #[error("{0}")]
    NotFound(String),

    /// A row matched where none was allowed.
    #[error("{0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::NotFound(msg) => Self::NotFound(msg),
            GateError::Conflict(msg) => Self::Conflict(msg),
            GateError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Builds the gate's base query: the caller's predicates plus the implicit
/// soft-delete filter.
pub fn live_rows<E: Audited>(condition: Condition) -> Select<E> {
    E::find()
        .filter(condition)
        .filter(E::is_deleted_col().eq(false))
}

/// Requires exactly one matching non-deleted row and returns it.
///
/// # Errors
///
/// Returns `GateError::NotFound` with `message` when no row matches.
pub async fn require_one<E, C>(
    conn: &C,
    condition: Condition,
    message: &str,
) -> Result<E::Model, GateError>
where
    E: Audited,
    C: ConnectionTrait,
{
    live_rows::<E>(condition)
        .one(conn)
        .await?
        .ok_or_else(|| GateError::NotFound(message.to_string()))
}

/// Requires that no matching non-deleted row exists.
///
/// Used for uniqueness checks such as "account name already exists" and
/// "one active budget per scope".
///
/// # Errors
///
/// Returns `GateError::Conflict` with `message` when a row matches.
pub async fn require_absent<E, C>(
    conn: &C,
    condition: Condition,
    message: &str,
) -> Result<(), GateError>
where
    E: Audited,
    C: ConnectionTrait,
{
    match live_rows::<E>(condition).one(conn).await? {
        Some(_) => Err(GateError::Conflict(message.to_string())),
        None => Ok(()),
    }
}

/// Looks up a matching non-deleted row; absence is not an error.
pub async fn find_optional<E, C>(
    conn: &C,
    condition: Condition,
) -> Result<Option<E::Model>, GateError>
where
    E: Audited,
    C: ConnectionTrait,
{
    Ok(live_rows::<E>(condition).one(conn).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::users;
    use sea_orm::{DatabaseBackend, DbBackend, MockDatabase, QueryTrait};
    use uuid::Uuid;

    fn sample_user() -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            is_active: true,
            is_deleted: false,
            created_at: chrono::Utc::now().into(),
        }
    }

    /// Every gate query carries the implicit soft-delete filter, so a
    /// predicate matching only a soft-deleted row behaves like no match.
    #[test]
    fn test_gate_query_excludes_soft_deleted() {
        let condition = Condition::all().add(users::Column::Email.eq("ada@example.com"));
        let sql = live_rows::<users::Entity>(condition)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""users"."is_deleted" = FALSE"#), "sql: {sql}");
    }

    #[tokio::test]
    async fn test_require_one_found() {
        let user = sample_user();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user.clone()]])
            .into_connection();

        let found = require_one::<users::Entity, _>(
            &db,
            Condition::all().add(users::Column::Id.eq(user.id)),
            "User not found",
        )
        .await
        .unwrap();

        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn test_require_one_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let err = require_one::<users::Entity, _>(
            &db,
            Condition::all().add(users::Column::Id.eq(Uuid::new_v4())),
            "User not found",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, GateError::NotFound(msg) if msg == "User not found"));
    }

    #[tokio::test]
    async fn test_require_absent_conflicts_on_match() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user()]])
            .into_connection();

        let err = require_absent::<users::Entity, _>(
            &db,
            Condition::all().add(users::Column::Email.eq("ada@example.com")),
            "Email already registered",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, GateError::Conflict(msg) if msg == "Email already registered"));
    }

    #[tokio::test]
    async fn test_find_optional_absence_is_ok() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let found = find_optional::<users::Entity, _>(&db, Condition::all())
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[test]
    fn test_gate_error_maps_to_app_error_status() {
        let not_found: AppError = GateError::NotFound("x".into()).into();
        let conflict: AppError = GateError::Conflict("y".into()).into();

        assert_eq!(not_found.status_code(), 404);
        assert_eq!(conflict.status_code(), 409);
    }
}
