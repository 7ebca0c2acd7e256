//! Category and sub-category repository.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, Set};
use uuid::Uuid;

use fintrack_shared::types::{PageMeta, PageRequest};

use crate::entities::{categories, sub_categories};
use crate::gate::{self, GateError};
use crate::paginate::paginate;

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Lookup or uniqueness gate failure.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or updating a category or sub-category.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

/// Category repository covering categories and their sub-categories.
#[derive(Debug)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category for the user.
    pub async fn create_category(
        &self,
        user_id: Uuid,
        input: CategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(input.name),
            description: Set(input.description),
            is_active: Set(true),
            is_deleted: Set(false),
            created_at: Set(Utc::now().into()),
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Lists the user's categories, newest first.
    pub async fn list_categories(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<(Vec<categories::Model>, PageMeta), CategoryError> {
        Ok(paginate::<categories::Entity, _>(
            &self.db,
            Condition::all().add(categories::Column::UserId.eq(user_id)),
            page,
        )
        .await?)
    }

    /// Fetches a single category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category does not exist or is
    /// soft-deleted.
    pub async fn get_category(&self, category_id: Uuid) -> Result<categories::Model, CategoryError> {
        Ok(gate::require_one::<categories::Entity, _>(
            &self.db,
            Condition::all().add(categories::Column::Id.eq(category_id)),
            "Category not found",
        )
        .await?)
    }

    /// Updates a category's name and/or description.
    pub async fn update_category(
        &self,
        category_id: Uuid,
        input: CategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let category = self.get_category(category_id).await?;

        let mut active: categories::ActiveModel = category.into();
        active.name = Set(input.name);
        active.description = Set(input.description);

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes a category.
    ///
    /// Sub-categories are NOT cascaded: they stay addressable by id after
    /// the parent is gone.
    pub async fn soft_delete_category(
        &self,
        category_id: Uuid,
    ) -> Result<categories::Model, CategoryError> {
        let category = self.get_category(category_id).await?;

        let mut active: categories::ActiveModel = category.into();
        active.is_deleted = Set(true);

        Ok(active.update(&self.db).await?)
    }

    /// Creates a sub-category under an existing category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the parent category does not exist.
    pub async fn create_sub_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        input: CategoryInput,
    ) -> Result<sub_categories::Model, CategoryError> {
        self.get_category(category_id).await?;

        let sub_category = sub_categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            category_id: Set(category_id),
            name: Set(input.name),
            description: Set(input.description),
            is_active: Set(true),
            is_deleted: Set(false),
            created_at: Set(Utc::now().into()),
        };

        Ok(sub_category.insert(&self.db).await?)
    }

    /// Lists the user's sub-categories, optionally scoped to one category.
    pub async fn list_sub_categories(
        &self,
        user_id: Uuid,
        category_id: Option<Uuid>,
        page: &PageRequest,
    ) -> Result<(Vec<sub_categories::Model>, PageMeta), CategoryError> {
        let mut condition = Condition::all().add(sub_categories::Column::UserId.eq(user_id));
        if let Some(category_id) = category_id {
            condition = condition.add(sub_categories::Column::CategoryId.eq(category_id));
        }

        Ok(paginate::<sub_categories::Entity, _>(&self.db, condition, page).await?)
    }

    /// Fetches a single sub-category.
    pub async fn get_sub_category(
        &self,
        sub_category_id: Uuid,
    ) -> Result<sub_categories::Model, CategoryError> {
        Ok(gate::require_one::<sub_categories::Entity, _>(
            &self.db,
            Condition::all().add(sub_categories::Column::Id.eq(sub_category_id)),
            "Subcategory not found",
        )
        .await?)
    }

    /// Updates a sub-category's name and/or description.
    pub async fn update_sub_category(
        &self,
        sub_category_id: Uuid,
        input: CategoryInput,
    ) -> Result<sub_categories::Model, CategoryError> {
        let sub_category = self.get_sub_category(sub_category_id).await?;

        let mut active: sub_categories::ActiveModel = sub_category.into();
        active.name = Set(input.name);
        active.description = Set(input.description);

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes a sub-category.
    pub async fn soft_delete_sub_category(
        &self,
        sub_category_id: Uuid,
    ) -> Result<sub_categories::Model, CategoryError> {
        let sub_category = self.get_sub_category(sub_category_id).await?;

        let mut active: sub_categories::ActiveModel = sub_category.into();
        active.is_deleted = Set(true);

        Ok(active.update(&self.db).await?)
    }
}
