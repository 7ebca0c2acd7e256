//! Transaction routes.
//!
//! Posting commits the whole write (transaction row, budget charges,
//! breach notification rows, balance) first, then pushes each breach to
//! the user's live WebSocket session. A failed push cannot roll anything
//! back; the durable notification row is already committed.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::{AppState, middleware::AuthUser};
use fintrack_db::TransactionRepository;
use fintrack_db::entities::sea_orm_active_enums::TransactionKind;
use fintrack_db::repositories::{PostTransactionInput, TransactionFilter};
use fintrack_shared::AppError;
use fintrack_shared::types::{PageRequest, PageResponse};

/// Creates the transactions router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(post_transaction))
        .route("/transactions", get(list_transactions))
        .route("/transactions/{transaction_id}", get(get_transaction))
        .route("/transactions/{transaction_id}", delete(delete_transaction))
}

#[derive(Debug, Deserialize)]
struct PostTransactionRequest {
    account_id: Uuid,
    category_id: Uuid,
    sub_category_id: Option<Uuid>,
    amount: Decimal,
    kind: TransactionKind,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ListTransactionsQuery {
    kind: Option<TransactionKind>,
    /// Comma-separated category ids.
    category_ids: Option<String>,
    /// Comma-separated account ids.
    account_ids: Option<String>,
    created_from: Option<DateTime<Utc>>,
    created_to: Option<DateTime<Utc>>,
    page: Option<u32>,
    per_page: Option<u32>,
}

fn parse_id_list(raw: &str, field: &str) -> Result<Vec<Uuid>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s)
                .map_err(|_| ApiError::from(AppError::Validation(format!("Invalid {field}: {s}"))))
        })
        .collect()
}

/// POST /transactions - Post a transaction and charge active budgets.
async fn post_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PostTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = TransactionRepository::new((*state.db).clone());
    let user_id = auth.user_id();

    let posted = repo
        .post(
            user_id,
            PostTransactionInput {
                account_id: payload.account_id,
                category_id: payload.category_id,
                sub_category_id: payload.sub_category_id,
                amount: payload.amount,
                kind: payload.kind,
                description: payload.description,
            },
        )
        .await?;

    info!(
        transaction_id = %posted.transaction.id,
        user_id = %user_id,
        breaches = posted.breaches.len(),
        "Transaction posted"
    );

    // Live delivery is best-effort and happens only after commit.
    for breach in &posted.breaches {
        warn!(user_id = %user_id, message = %breach.message, "Budget limit breached");
        state
            .dispatcher
            .send(user_id, json!({ "message": breach.message }).to_string())
            .await;
    }

    Ok((StatusCode::CREATED, Json(posted.transaction)))
}

/// GET /transactions - List the user's transactions with optional filters.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = TransactionRepository::new((*state.db).clone());

    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = TransactionFilter {
        kind: query.kind,
        category_ids: query
            .category_ids
            .as_deref()
            .map(|raw| parse_id_list(raw, "category id"))
            .transpose()?,
        account_ids: query
            .account_ids
            .as_deref()
            .map(|raw| parse_id_list(raw, "account id"))
            .transpose()?,
        created_from: query.created_from,
        created_to: query.created_to,
    };

    let (transactions, meta) = repo.list(auth.user_id(), filter, &page).await?;

    Ok(Json(PageResponse::new(transactions, meta)))
}

/// GET /transactions/{transaction_id} - Fetch a single transaction.
async fn get_transaction(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = TransactionRepository::new((*state.db).clone());

    let transaction = repo.get(transaction_id).await?;

    Ok(Json(transaction))
}

/// DELETE /transactions/{transaction_id} - Soft-delete a transaction.
///
/// The account balance and budget charges are not reversed.
async fn delete_transaction(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = TransactionRepository::new((*state.db).clone());

    let transaction = repo.soft_delete(transaction_id).await?;

    info!(transaction_id = %transaction.id, "Transaction soft-deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_id_list() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let raw = format!("{a}, {b}");

        let parsed = parse_id_list(&raw, "category id").unwrap();
        assert_eq!(parsed, vec![a, b]);
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("123")]
    #[case("b4b4b4b4-dead-beef-0000")]
    fn test_parse_id_list_rejects_garbage(#[case] raw: &str) {
        assert!(parse_id_list(raw, "account id").is_err());
    }

    #[rstest]
    #[case("{id},,")]
    #[case(",{id}")]
    #[case(" {id} , ")]
    fn test_parse_id_list_skips_empty_segments(#[case] pattern: &str) {
        let a = Uuid::new_v4();
        let raw = pattern.replace("{id}", &a.to_string());

        let parsed = parse_id_list(&raw, "category id").unwrap();
        assert_eq!(parsed, vec![a]);
    }
}
