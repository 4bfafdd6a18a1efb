//! Authentication HTTP handlers.
//!
//! This module implements the public auth endpoints:
//! - POST /api/v1/auth/register - Create a shop owner account
//! - POST /api/v1/auth/login - Exchange credentials for a bearer token

use axum::{Json, extract::State};
use chrono::Utc;

use crate::{
    db::DbPool,
    error::AppError,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, UserResponse},
    services::auth_service::{self, TokenSigner},
};

/// Register a new shop owner account.
///
/// # Endpoint
///
/// `POST /api/v1/auth/register`
///
/// # Request Body
///
/// ```json
/// {
///   "username": "amina",
///   "password": "correct horse battery",
///   "shop_name": "Amina's Electronics"
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Returns the created user
/// - **Error (400)**: Empty username or password shorter than 8 characters
/// - **Error (409)**: Username already taken
///
/// New accounts start with no entitlement window: registration alone does
/// not unlock anything.
pub async fn register(
    State(pool): State<DbPool>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = auth_service::register(&pool, request, Utc::now().timestamp_millis()).await?;

    // Convert User to UserResponse (removes password_hash)
    Ok(Json(user.into()))
}

/// Log in and receive a bearer token.
///
/// # Endpoint
///
/// `POST /api/v1/auth/login`
///
/// # Response
///
/// - **Success (200 OK)**: `{ "token": "...", "user": { ... } }`
/// - **Error (401)**: Unknown username or wrong password
///
/// ```json
/// {
///   "token": "eyJhbGciOi...",
///   "user": { "id": 1, "username": "amina", "role": "user", ... }
/// }
/// ```
pub async fn login(
    State(pool): State<DbPool>,
    State(tokens): State<TokenSigner>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (token, user) =
        auth_service::login(&pool, &tokens, request, Utc::now().timestamp_millis()).await?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}
