//! Category and sub-category routes.

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
use fintrack_db::CategoryRepository;
use fintrack_db::repositories::CategoryInput;
use fintrack_shared::types::{PageRequest, PageResponse};

/// Creates the categories router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route("/categories", get(list_categories))
        .route("/categories/{category_id}", get(get_category))
        .route("/categories/{category_id}", put(update_category))
        .route("/categories/{category_id}", delete(delete_category))
        .route(
            "/categories/{category_id}/sub-categories",
            post(create_sub_category),
        )
        .route("/sub-categories", get(list_sub_categories))
        .route("/sub-categories/{sub_category_id}", get(get_sub_category))
        .route(
            "/sub-categories/{sub_category_id}",
            put(update_sub_category),
        )
        .route(
            "/sub-categories/{sub_category_id}",
            delete(delete_sub_category),
        )
}

#[derive(Debug, Deserialize)]
struct CategoryRequest {
    name: String,
    #[serde(default)]
    description: String,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(payload: CategoryRequest) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
        }
    }
}

/// POST /categories - Create a category.
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = CategoryRepository::new((*state.db).clone());

    let category = repo.create_category(auth.user_id(), payload.into()).await?;

    info!(category_id = %category.id, user_id = %auth.user_id(), "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /categories - List the user's categories, newest first.
async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = CategoryRepository::new((*state.db).clone());

    let (categories, meta) = repo.list_categories(auth.user_id(), &page).await?;

    Ok(Json(PageResponse::new(categories, meta)))
}

/// GET /categories/{category_id} - Fetch a single category.
async fn get_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(category_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = CategoryRepository::new((*state.db).clone());

    let category = repo.get_category(category_id).await?;

    Ok(Json(category))
}

/// PUT /categories/{category_id} - Update a category.
async fn update_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = CategoryRepository::new((*state.db).clone());

    let category = repo.update_category(category_id, payload.into()).await?;

    Ok(Json(category))
}

/// DELETE /categories/{category_id} - Soft-delete a category.
///
/// Sub-categories are not cascaded.
async fn delete_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(category_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = CategoryRepository::new((*state.db).clone());

    let category = repo.soft_delete_category(category_id).await?;

    info!(category_id = %category.id, "Category soft-deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /categories/{category_id}/sub-categories - Create a sub-category.
async fn create_sub_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = CategoryRepository::new((*state.db).clone());

    let sub_category = repo
        .create_sub_category(auth.user_id(), category_id, payload.into())
        .await?;

    info!(
        sub_category_id = %sub_category.id,
        category_id = %category_id,
        "Sub-category created"
    );

    Ok((StatusCode::CREATED, Json(sub_category)))
}

#[derive(Debug, Deserialize)]
struct ListSubCategoriesQuery {
    category_id: Option<Uuid>,
    // serde(flatten) breaks numeric query params under serde_urlencoded,
    // so the pagination fields are spelled out.
    page: Option<u32>,
    per_page: Option<u32>,
}

impl ListSubCategoriesQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// GET /sub-categories - List sub-categories, optionally scoped to a category.
async fn list_sub_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListSubCategoriesQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = CategoryRepository::new((*state.db).clone());

    let (sub_categories, meta) = repo
        .list_sub_categories(auth.user_id(), query.category_id, &query.page_request())
        .await?;

    Ok(Json(PageResponse::new(sub_categories, meta)))
}

/// GET /sub-categories/{sub_category_id} - Fetch a single sub-category.
async fn get_sub_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(sub_category_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = CategoryRepository::new((*state.db).clone());

    let sub_category = repo.get_sub_category(sub_category_id).await?;

    Ok(Json(sub_category))
}

/// PUT /sub-categories/{sub_category_id} - Update a sub-category.
async fn update_sub_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(sub_category_id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = CategoryRepository::new((*state.db).clone());

    let sub_category = repo
        .update_sub_category(sub_category_id, payload.into())
        .await?;

    Ok(Json(sub_category))
}

/// DELETE /sub-categories/{sub_category_id} - Soft-delete a sub-category.
async fn delete_sub_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(sub_category_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = CategoryRepository::new((*state.db).clone());

    let sub_category = repo.soft_delete_sub_category(sub_category_id).await?;

    info!(sub_category_id = %sub_category.id, "Sub-category soft-deleted");

    Ok(StatusCode::NO_CONTENT)
}
