//! Generic paginated query helper.
//!
//! Returns a page of non-deleted rows ordered by creation time descending,
//! plus total-count metadata. The count and page queries run back to back;
//! a concurrent insert between them can make `total_pages` transiently
//! inconsistent with the returned page, which is acceptable for this
//! domain.

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};

use fintrack_shared::types::{PageMeta, PageRequest};

use crate::gate::Audited;

/// Builds the filtered query: caller predicates plus
/// `is_deleted = false OR is_deleted IS NULL`.
fn page_rows<E: Audited>(condition: Condition) -> Select<E> {
    let not_deleted = Condition::any()
        .add(E::is_deleted_col().eq(false))
        .add(E::is_deleted_col().is_null());

    E::find().filter(condition).filter(not_deleted)
}

/// Returns one page of matching rows, newest first, with count metadata.
///
/// An empty result set is not an error: the page is empty and the metadata
/// reports `total_count = 0`, `total_pages = 0`.
///
/// # Errors
///
/// Returns an error if either the count or the page query fails.
pub async fn paginate<E, C>(
    conn: &C,
    condition: Condition,
    request: &PageRequest,
) -> Result<(Vec<E::Model>, PageMeta), DbErr>
where
    E: Audited,
    E::Model: FromQueryResult + Sized + Send + Sync,
    C: ConnectionTrait,
{
    let query = page_rows::<E>(condition);

    let total_count = query.clone().count(conn).await?;

    let rows = query
        .order_by_desc(E::created_at_col())
        .offset(request.offset())
        .limit(request.limit())
        .all(conn)
        .await?;

    Ok((rows, PageMeta::new(request, total_count)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{transactions, users};
    use sea_orm::{DatabaseBackend, DbBackend, MockDatabase, QueryTrait, Value};
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn sample_user(name: &str) -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "$argon2id$stub".to_string(),
            is_active: true,
            is_deleted: false,
            created_at: chrono::Utc::now().into(),
        }
    }

    fn count_row(total: i64) -> BTreeMap<&'static str, Value> {
        [("num_items", Value::from(total))].into_iter().collect()
    }

    #[tokio::test]
    async fn test_paginate_returns_rows_and_meta() {
        let rows = vec![sample_user("ada"), sample_user("grace")];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(3)]])
            .append_query_results([rows.clone()])
            .into_connection();

        let request = PageRequest {
            page: 1,
            per_page: 2,
        };
        let (page, meta) = paginate::<users::Entity, _>(&db, Condition::all(), &request)
            .await
            .unwrap();

        assert_eq!(page, rows);
        assert_eq!(meta.total_count, 3);
        assert_eq!(meta.total_pages, 2);
    }

    #[tokio::test]
    async fn test_paginate_empty_result_is_not_an_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(0)]])
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let (page, meta) = paginate::<users::Entity, _>(&db, Condition::all(), &PageRequest::default())
            .await
            .unwrap();

        assert!(page.is_empty());
        assert_eq!(meta.total_count, 0);
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn test_page_query_shape() {
        let user_id = Uuid::new_v4();
        let request = PageRequest {
            page: 2,
            per_page: 10,
        };

        let sql = page_rows::<transactions::Entity>(
            Condition::all().add(transactions::Column::UserId.eq(user_id)),
        )
        .order_by_desc(transactions::Entity::created_at_col())
        .offset(request.offset())
        .limit(request.limit())
        .build(DbBackend::Postgres)
        .to_string();

        assert!(
            sql.contains(r#"ORDER BY "transactions"."created_at" DESC"#),
            "sql: {sql}"
        );
        assert!(sql.contains("LIMIT 10"), "sql: {sql}");
        assert!(sql.contains("OFFSET 10"), "sql: {sql}");
    }

    #[test]
    fn test_page_query_tolerates_null_is_deleted() {
        let sql = page_rows::<transactions::Entity>(Condition::all())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(
            sql.contains(r#""transactions"."is_deleted" = FALSE"#),
            "sql: {sql}"
        );
        assert!(
            sql.contains(r#""transactions"."is_deleted" IS NULL"#),
            "sql: {sql}"
        );
    }
}
