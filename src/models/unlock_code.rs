//! Unlock code data models and API request/response types.

use serde::{Deserialize, Serialize};

/// Represents an unlock code record from the database.
///
/// # Database Table
///
/// Maps to the `unlock_codes` table. Each code:
/// - Is bound to the account it was issued for (`user_id`)
/// - Carries the absolute expiry of the window it grants (`until`)
/// - Burns exactly once: `used` flips via a conditional update
///
/// `until` is fixed at issue time. Redeeming late does not stretch the
/// window; the account is simply entitled for whatever remains.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct UnlockCode {
    /// Unique identifier for this code
    pub id: i64,

    /// The code text itself, e.g. `UNLK-7Q2M9XKZR4A1B8CD`
    pub code: String,

    /// Account this code was issued for
    pub user_id: i64,

    /// Timestamp when the code was issued (epoch milliseconds)
    pub created_at: i64,

    /// Absolute end of the window this code grants (epoch milliseconds)
    pub until: i64,

    /// Whether the code has been redeemed
    pub used: bool,

    /// Account that redeemed it, if redeemed
    pub used_by: Option<i64>,

    /// Redemption timestamp (epoch milliseconds), if redeemed
    pub used_at: Option<i64>,
}

/// Admin read model: a code joined with the username it was issued for.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct UnlockCodeWithUser {
    pub id: i64,
    pub code: String,
    pub user_id: i64,
    pub for_username: String,
    pub created_at: i64,
    pub until: i64,
    pub used: bool,
    pub used_by: Option<i64>,
    pub used_at: Option<i64>,
}

/// Request body for redeeming an unlock code.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub code: String,
}

/// Response body for a successful redemption.
#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    /// The account's new entitlement expiry (epoch milliseconds)
    pub unlocked_until: i64,
}
