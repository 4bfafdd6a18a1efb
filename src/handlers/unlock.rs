//! Unlock request and code redemption HTTP handlers.
//!
//! This module implements the shop-owner side of the unlock flow:
//! - POST /api/v1/unlock/requests - Ask for an unlock
//! - POST /api/v1/unlock/redeem - Redeem a code received out of band
//!
//! The admin side (listing and resolving requests, listing codes) lives
//! in the admin handlers.

use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        request::{RequestResponse, SubmitUnlockRequest},
        unlock_code::{RedeemRequest, RedeemResponse},
    },
    services::{code_service, request_service},
};

/// Submit an unlock request.
///
/// Open to locked accounts; this endpoint is how a locked shop gets
/// unlocked, so it sits outside the entitlement gate.
pub async fn submit_request(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<SubmitUnlockRequest>,
) -> Result<Json<RequestResponse>, AppError> {
    let submitted = request_service::submit_request(
        &pool,
        auth.user_id,
        request,
        Utc::now().timestamp_millis(),
    )
    .await?;

    Ok(Json(submitted.into()))
}

/// Redeem an unlock code for the authenticated account.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "unlocked_until": 1775000000000 }`
/// - **Error (404)**: Unknown code
/// - **Error (403)**: Code issued to a different account
/// - **Error (409)**: Code already used
/// - **Error (410)**: Code expired before redemption
pub async fn redeem_code(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>, AppError> {
    let code = code_service::redeem(
        &pool,
        auth.user_id,
        &request.code,
        Utc::now().timestamp_millis(),
    )
    .await?;

    Ok(Json(RedeemResponse {
        unlocked_until: code.until,
    }))
}
