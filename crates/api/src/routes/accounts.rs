//! Account management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::{AppState, middleware::AuthUser};
use fintrack_db::AccountRepository;
use fintrack_db::repositories::{CreateAccountInput, UpdateAccountInput};
use fintrack_shared::types::{PageRequest, PageResponse};

/// Creates the accounts router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts", get(list_accounts))
        .route("/accounts/{account_id}", get(get_account))
        .route("/accounts/{account_id}", put(update_account))
        .route("/accounts/{account_id}", delete(delete_account))
}

#[derive(Debug, Deserialize)]
struct CreateAccountRequest {
    name: String,
    account_type: String,
}

#[derive(Debug, Deserialize)]
struct UpdateAccountRequest {
    name: Option<String>,
    account_type: Option<String>,
}

/// POST /accounts - Create an account with a zero starting balance.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new((*state.db).clone());

    let account = repo
        .create(
            auth.user_id(),
            CreateAccountInput {
                name: payload.name,
                account_type: payload.account_type,
            },
        )
        .await?;

    info!(account_id = %account.id, user_id = %auth.user_id(), "Account created");

    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /accounts - List the user's accounts, newest first.
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new((*state.db).clone());

    let (accounts, meta) = repo.list(auth.user_id(), &page).await?;

    Ok(Json(PageResponse::new(accounts, meta)))
}

/// GET /accounts/{account_id} - Fetch a single account.
async fn get_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(account_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new((*state.db).clone());

    let account = repo.get(account_id).await?;

    Ok(Json(account))
}

/// PUT /accounts/{account_id} - Update an account's name and/or type.
async fn update_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new((*state.db).clone());

    let account = repo
        .update(
            account_id,
            UpdateAccountInput {
                name: payload.name,
                account_type: payload.account_type,
            },
        )
        .await?;

    Ok(Json(account))
}

/// DELETE /accounts/{account_id} - Soft-delete an account.
async fn delete_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(account_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new((*state.db).clone());

    let account = repo.soft_delete(account_id).await?;

    info!(account_id = %account.id, "Account soft-deleted");

    Ok(StatusCode::NO_CONTENT)
}
