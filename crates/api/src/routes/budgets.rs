//! Budget management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::{AppState, middleware::AuthUser};
use fintrack_db::BudgetRepository;
use fintrack_db::entities::sea_orm_active_enums::{BudgetScope, BudgetStatus};
use fintrack_db::repositories::{BudgetFilter, CreateBudgetInput, UpdateBudgetInput};
use fintrack_shared::types::{PageRequest, PageResponse};

/// Creates the budgets router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets/overall", post(create_overall_budget))
        .route("/budgets/accounts/{account_id}", post(create_account_budget))
        .route("/budgets", get(list_budgets))
        .route("/budgets/{budget_id}", get(get_budget))
        .route("/budgets/{budget_id}", put(update_budget))
        .route("/budgets/{budget_id}", delete(delete_budget))
}

#[derive(Debug, Deserialize)]
struct CreateBudgetRequest {
    limit: Decimal,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

impl From<CreateBudgetRequest> for CreateBudgetInput {
    fn from(payload: CreateBudgetRequest) -> Self {
        Self {
            limit: payload.limit,
            start_date: payload.start_date,
            end_date: payload.end_date,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateBudgetRequest {
    limit: Option<Decimal>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    status: Option<BudgetStatus>,
}

#[derive(Debug, Deserialize)]
struct ListBudgetsQuery {
    status: Option<BudgetStatus>,
    scope: Option<BudgetScope>,
    account_id: Option<Uuid>,
    created_from: Option<DateTime<Utc>>,
    created_to: Option<DateTime<Utc>>,
    page: Option<u32>,
    per_page: Option<u32>,
}

/// POST /budgets/overall - Create the user's overall budget.
async fn create_overall_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBudgetRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = BudgetRepository::new((*state.db).clone());

    let budget = repo.create_overall(auth.user_id(), payload.into()).await?;

    info!(budget_id = %budget.id, user_id = %auth.user_id(), "Overall budget created");

    Ok((StatusCode::CREATED, Json(budget)))
}

/// POST /budgets/accounts/{account_id} - Create an account-scoped budget.
async fn create_account_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<CreateBudgetRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = BudgetRepository::new((*state.db).clone());

    let budget = repo
        .create_for_account(auth.user_id(), account_id, payload.into())
        .await?;

    info!(
        budget_id = %budget.id,
        account_id = %account_id,
        "Account budget created"
    );

    Ok((StatusCode::CREATED, Json(budget)))
}

/// GET /budgets - List the user's budgets with optional filters.
async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListBudgetsQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = BudgetRepository::new((*state.db).clone());

    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = BudgetFilter {
        status: query.status,
        scope: query.scope,
        account_id: query.account_id,
        created_from: query.created_from,
        created_to: query.created_to,
    };

    let (budgets, meta) = repo.list(auth.user_id(), filter, &page).await?;

    Ok(Json(PageResponse::new(budgets, meta)))
}

/// GET /budgets/{budget_id} - Fetch a single budget.
async fn get_budget(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = BudgetRepository::new((*state.db).clone());

    let budget = repo.get(budget_id).await?;

    Ok(Json(budget))
}

/// PUT /budgets/{budget_id} - Update a budget's limit, dates, or status.
///
/// The accumulated spend is never updatable through this endpoint.
async fn update_budget(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<UpdateBudgetRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = BudgetRepository::new((*state.db).clone());

    let budget = repo
        .update(
            budget_id,
            UpdateBudgetInput {
                limit: payload.limit,
                start_date: payload.start_date,
                end_date: payload.end_date,
                status: payload.status,
            },
        )
        .await?;

    Ok(Json(budget))
}

/// DELETE /budgets/{budget_id} - Soft-delete a budget.
async fn delete_budget(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = BudgetRepository::new((*state.db).clone());

    let budget = repo.soft_delete(budget_id).await?;

    info!(budget_id = %budget.id, "Budget soft-deleted");

    Ok(StatusCode::NO_CONTENT)
}
