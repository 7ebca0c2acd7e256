//! `SeaORM` entity definitions.
//!
//! Every table shares the common base columns: `id`, `is_active`,
//! `is_deleted` (soft delete is the only deletion mechanism), `created_at`.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod notifications;
pub mod sea_orm_active_enums;
pub mod sub_categories;
pub mod transactions;
pub mod users;

use crate::gate::Audited;

macro_rules! impl_audited {
    ($($entity:ident),* $(,)?) => {
        $(
            impl Audited for $entity::Entity {
                fn is_deleted_col() -> Self::Column {
                    $entity::Column::IsDeleted
                }

                fn created_at_col() -> Self::Column {
                    $entity::Column::CreatedAt
                }
            }
        )*
    };
}

impl_audited!(
    accounts,
    budgets,
    categories,
    notifications,
    sub_categories,
    transactions,
    users,
);
