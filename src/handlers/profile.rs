//! Shop profile HTTP handlers.
//!
//! This module implements the profile endpoints:
//! - GET /api/v1/profile - Current account details
//! - PUT /api/v1/profile - Update shop details

use axum::{Extension, Json, extract::State};

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::user::{UpdateProfileRequest, User, UserResponse},
    services::auth_service,
};

/// Get the authenticated account, including its entitlement expiry.
///
/// The frontend uses `unlocked_until` to decide whether to show the
/// locked banner; the server still re-checks on every gated operation.
pub async fn get_profile(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserResponse>, AppError> {
    let user = auth_service::get_user(&pool, auth.user_id).await?;

    Ok(Json(user.into()))
}

/// Update shop details.
///
/// `shop_name` and `shop_address` are replaced wholesale; `logo_path` is
/// only overwritten when the request carries one.
pub async fn update_profile(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET shop_name = ?, shop_address = ?, logo_path = COALESCE(?, logo_path)
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(request.shop_name.trim())
    .bind(request.shop_address.trim())
    .bind(request.logo_path)
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::UserNotFound)?;

    Ok(Json(user.into()))
}
