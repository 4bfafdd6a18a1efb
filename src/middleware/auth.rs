//! Bearer token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the bearer token from the Authorization header
//! 2. Verify its signature and expiry
//! 3. Inject authentication context into the request
//! 4. Reject unauthorized requests with HTTP 401

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, models::user::Role, services::auth_service::TokenSigner};

/// Authentication context attached to authenticated requests.
///
/// This struct is inserted into the request's extension map and can be
/// extracted by route handlers to know who made the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// ID of the authenticated user
    ///
    /// Used to scope database queries (e.g., only show this shop's products)
    pub user_id: i64,

    /// Username at token issue time
    pub username: String,

    /// Role at token issue time
    pub role: Role,
}

/// Bearer token authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header from request
/// 2. Verify the token's signature and expiry
/// 3. If valid: inject `AuthContext` into request, call next handler
/// 4. If not: return 401 Unauthorized error
///
/// # Headers
///
/// Expected header format:
/// ```text
/// Authorization: Bearer eyJhbGciOi...
/// ```
///
/// Verification is purely cryptographic; no database round trip per
/// request. A deleted account's surviving token fails later at the
/// service layer instead.
pub async fn auth_middleware(
    State(tokens): State<TokenSigner>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidToken)?;

    // Expected format: "Bearer <token>"
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidToken)?;

    let claims = tokens.verify(token)?;

    // Inject context into request extensions
    // Route handlers can now extract this using Extension<AuthContext>
    request.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        username: claims.username,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Admin gate, layered inside `auth_middleware` on admin routes.
///
/// Relies on the `AuthContext` the outer middleware inserted; a non-admin
/// token gets 403 without reaching the handler.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = request
        .extensions()
        .get::<AuthContext>()
        .is_some_and(|auth| auth.role == Role::Admin);

    if !is_admin {
        return Err(AppError::AdminOnly);
    }

    Ok(next.run(request).await)
}
