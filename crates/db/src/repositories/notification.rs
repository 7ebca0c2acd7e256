//! Notification repository.
//!
//! Rows are created by the transaction poster when a budget breaches;
//! this repository only reads them back, marks them read, and soft-deletes
//! them.

use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, Set};
use uuid::Uuid;

use fintrack_shared::types::{PageMeta, PageRequest};

use crate::entities::notifications;
use crate::gate::{self, GateError};
use crate::paginate::paginate;

/// Error types for notification operations.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Lookup gate failure.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Notification repository.
#[derive(Debug)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the user's notifications, newest first.
    pub async fn list(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<(Vec<notifications::Model>, PageMeta), NotificationError> {
        Ok(paginate::<notifications::Entity, _>(
            &self.db,
            Condition::all().add(notifications::Column::UserId.eq(user_id)),
            page,
        )
        .await?)
    }

    /// Marks a notification as read. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the notification does not exist or is
    /// soft-deleted.
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
    ) -> Result<notifications::Model, NotificationError> {
        let notification = self.get(notification_id).await?;

        let mut active: notifications::ActiveModel = notification.into();
        active.is_read = Set(true);

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes a notification.
    pub async fn soft_delete(
        &self,
        notification_id: Uuid,
    ) -> Result<notifications::Model, NotificationError> {
        let notification = self.get(notification_id).await?;

        let mut active: notifications::ActiveModel = notification.into();
        active.is_deleted = Set(true);

        Ok(active.update(&self.db).await?)
    }

    async fn get(
        &self,
        notification_id: Uuid,
    ) -> Result<notifications::Model, NotificationError> {
        Ok(gate::require_one::<notifications::Entity, _>(
            &self.db,
            Condition::all().add(notifications::Column::Id.eq(notification_id)),
            "Notification not found",
        )
        .await?)
    }
}
