//! Authentication routes for registration and login.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use fintrack_core::auth::{hash_password, verify_password};
use fintrack_db::UserRepository;
use fintrack_shared::auth::{LoginRequest, RegisterRequest, TokenResponse};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Public view of a registered user.
#[derive(Debug, Serialize)]
struct RegisterResponse {
    id: Uuid,
    name: String,
    email: String,
    token: TokenResponse,
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_repo = UserRepository::new((*state.db).clone());

    let password_hash = hash_password(&payload.password)
        .map_err(|e| ApiError::internal(format!("Password hashing failed: {e}")))?;

    let user = user_repo
        .register(&payload.name, &payload.email, &password_hash)
        .await?;

    let access_token = state
        .jwt_service
        .generate_access_token(user.id)
        .map_err(|e| ApiError::internal(format!("Token generation failed: {e}")))?;

    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token: TokenResponse::new(access_token, state.jwt_service.access_token_expires_in()),
        }),
    ))
}

/// POST /auth/login - Authenticate a user and return an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = user_repo
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    if !user.is_active {
        return Err(ApiError::unauthorized("This account has been disabled"));
    }

    let valid = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| ApiError::internal(format!("Password verification failed: {e}")))?;
    if !valid {
        info!(user_id = %user.id, "Failed login attempt");
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let access_token = state
        .jwt_service
        .generate_access_token(user.id)
        .map_err(|e| ApiError::internal(format!("Token generation failed: {e}")))?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse::new(
        access_token,
        state.jwt_service.access_token_expires_in(),
    )))
}
