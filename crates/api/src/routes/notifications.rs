//! Notification routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch},
};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::{AppState, middleware::AuthUser};
use fintrack_db::NotificationRepository;
use fintrack_shared::types::{PageRequest, PageResponse};

/// Creates the notifications router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/{notification_id}/read", patch(mark_read))
        .route(
            "/notifications/{notification_id}",
            delete(delete_notification),
        )
}

/// GET /notifications - List the user's notifications, newest first.
async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = NotificationRepository::new((*state.db).clone());

    let (notifications, meta) = repo.list(auth.user_id(), &page).await?;

    Ok(Json(PageResponse::new(notifications, meta)))
}

/// PATCH /notifications/{notification_id}/read - Mark a notification as read.
async fn mark_read(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = NotificationRepository::new((*state.db).clone());

    let notification = repo.mark_read(notification_id).await?;

    Ok(Json(notification))
}

/// DELETE /notifications/{notification_id} - Soft-delete a notification.
async fn delete_notification(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = NotificationRepository::new((*state.db).clone());

    let notification = repo.soft_delete(notification_id).await?;

    info!(notification_id = %notification.id, "Notification soft-deleted");

    Ok(StatusCode::NO_CONTENT)
}
