//! API route definitions.

use axum::{Router, middleware, routing::get};

use crate::{AppState, middleware::auth::auth_middleware, ws::handler::notifications_ws};

pub mod accounts;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod health;
pub mod notifications;
pub mod transactions;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(accounts::routes())
        .merge(categories::routes())
        .merge(budgets::routes())
        .merge(transactions::routes())
        .merge(notifications::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes. The WebSocket endpoint is
    // public: browsers cannot set an Authorization header on the
    // handshake.
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .route("/notifications/ws/{user_id}", get(notifications_ws))
        .merge(protected_routes)
}
