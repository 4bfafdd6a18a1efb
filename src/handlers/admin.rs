//! Admin HTTP handlers.
//!
//! This module implements the admin-only endpoints, all behind the
//! `require_admin` gate:
//! - GET /api/v1/admin/requests - List every unlock request
//! - POST /api/v1/admin/requests/{id}/approve - Approve and issue a code
//! - POST /api/v1/admin/requests/{id}/decline - Decline
//! - GET /api/v1/admin/codes - List every issued code

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        request::{ApprovalResponse, ApproveRequestBody, UnlockRequestWithUser},
        unlock_code::UnlockCodeWithUser,
    },
    services::{code_service, request_service},
};

/// List every unlock request with its submitter's username, newest first.
pub async fn list_requests(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<UnlockRequestWithUser>>, AppError> {
    let requests = request_service::list_requests(&pool).await?;

    Ok(Json(requests))
}

/// Approve a pending request and issue an unlock code for its submitter.
///
/// # Request Body
///
/// ```json
/// { "duration": 2, "unit": "months" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "code": "UNLK-...", "for_username": "amina", "until": ... }`
/// - **Error (400)**: Duration below 1
/// - **Error (404)**: No such request
/// - **Error (409)**: Request already approved or declined
///
/// The admin relays the returned code to the shop owner out of band;
/// nothing is unlocked until the owner redeems it.
pub async fn approve_request(
    State(pool): State<DbPool>,
    Path(request_id): Path<i64>,
    Json(body): Json<ApproveRequestBody>,
) -> Result<Json<ApprovalResponse>, AppError> {
    let approval = request_service::approve_request(
        &pool,
        request_id,
        body.duration,
        body.unit,
        Utc::now().timestamp_millis(),
    )
    .await?;

    Ok(Json(ApprovalResponse {
        code: approval.code.code,
        for_username: approval.for_username,
        until: approval.code.until,
    }))
}

/// Decline a pending request.
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (404)**: No such request
/// - **Error (409)**: Request already approved or declined
pub async fn decline_request(
    State(pool): State<DbPool>,
    Path(request_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    request_service::decline_request(&pool, request_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List every issued code with the username it was issued for, newest first.
pub async fn list_codes(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<UnlockCodeWithUser>>, AppError> {
    let codes = code_service::list_codes(&pool).await?;

    Ok(Json(codes))
}
