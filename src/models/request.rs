//! Unlock request data models and API request/response types.
//!
//! This module defines:
//! - `UnlockRequest`: Database entity representing a pending/resolved request
//! - `RequestStatus`: Request state machine, stored as lowercase text
//! - `DurationUnit`: Flat calendar units used when approving
//! - Request/response bodies for the submit, approve, and admin list endpoints

use serde::{Deserialize, Serialize};

/// State of an unlock request.
///
/// Stored in the `status` column as lowercase text. A request starts as
/// `pending` and moves to `approved` or `declined` exactly once; there are
/// no other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Declined,
}

/// Flat calendar unit for an approval's entitlement window.
///
/// These are deliberately flat: a day is 86 400 seconds, a month is 30
/// days, a year is 365 days. No calendar arithmetic, no leap handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Days,
    Months,
    Years,
}

/// Represents an unlock request record from the database.
///
/// # Database Table
///
/// Maps to the `requests` table. Each request belongs to the user who
/// submitted it; admins see requests from every account.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct UnlockRequest {
    /// Unique identifier for this request
    pub id: i64,

    /// Foreign key to the submitting user
    pub user_id: i64,

    /// Amount the requester claims to have paid, in cents
    pub amount: i64,

    /// Free-form note from the requester
    pub details: String,

    /// Current state (`pending`, `approved`, or `declined`)
    pub status: RequestStatus,

    /// Timestamp when the request was submitted (epoch milliseconds)
    pub created_at: i64,
}

/// Admin read model: a request joined with its submitter's username.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct UnlockRequestWithUser {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub amount: i64,
    pub details: String,
    pub status: RequestStatus,
    pub created_at: i64,
}

/// Request body for submitting an unlock request.
#[derive(Debug, Deserialize)]
pub struct SubmitUnlockRequest {
    #[serde(default)]
    pub amount: i64,

    #[serde(default)]
    pub details: String,
}

/// Request body for approving an unlock request.
///
/// # JSON Example
///
/// ```json
/// { "duration": 2, "unit": "months" }
/// ```
#[derive(Debug, Deserialize)]
pub struct ApproveRequestBody {
    /// How many units the granted window should last. Must be at least 1.
    pub duration: i64,

    /// Calendar unit, defaults to days
    #[serde(default)]
    pub unit: DurationUnit,
}

/// Response body returned to the admin after an approval.
#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    /// The freshly issued unlock code
    pub code: String,

    /// Username of the account the code is bound to
    pub for_username: String,

    /// Absolute end of the granted window (epoch milliseconds)
    pub until: i64,
}

/// Response body for request endpoints.
#[derive(Debug, Serialize)]
pub struct RequestResponse {
    pub id: i64,
    pub amount: i64,
    pub details: String,
    pub status: RequestStatus,
    pub created_at: i64,
}

/// Convert database UnlockRequest to API RequestResponse.
///
/// This transformation - Removes the internal `user_id` field
impl From<UnlockRequest> for RequestResponse {
    fn from(request: UnlockRequest) -> Self {
        Self {
            id: request.id,
            amount: request.amount,
            details: request.details,
            status: request.status,
            created_at: request.created_at,
        }
    }
}
