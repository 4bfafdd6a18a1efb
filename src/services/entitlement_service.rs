//! Entitlement service - The per-account entitlement ledger.
//!
//! Every account carries at most one entitlement window, stored as an
//! absolute expiry (`users.unlocked_until`, epoch milliseconds). There is
//! no background job and no stored "locked" flag: entitlement is evaluated
//! lazily by comparing the expiry against the current time at the moment
//! a gated operation runs.
//!
//! # Extension Semantics
//!
//! [`extend`] overwrites the stored expiry with the new one, even if the
//! new expiry is earlier than the old. Whoever grants the window decides
//! its end; grants do not stack.

use crate::{db::DbPool, error::AppError};

/// Is a window with this expiry live at `now_ms`?
///
/// `None` (never unlocked) and an expiry exactly equal to `now_ms` both
/// count as locked: the window is `until > now`, exclusive at the end.
pub fn is_entitled(unlocked_until: Option<i64>, now_ms: i64) -> bool {
    matches!(unlocked_until, Some(until) if until > now_ms)
}

/// Read an account's stored expiry.
///
/// # Errors
///
/// - `UserNotFound`: No such account
/// - `Database`: Database error occurred
pub async fn window(pool: &DbPool, user_id: i64) -> Result<Option<i64>, AppError> {
    sqlx::query_scalar::<_, Option<i64>>("SELECT unlocked_until FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::UserNotFound)
}

/// Overwrite an account's entitlement expiry.
///
/// Takes any executor so it can run inside a caller's transaction (code
/// redemption commits the burn and the extension together).
///
/// # Errors
///
/// - `UserNotFound`: No such account
/// - `Database`: Database error occurred
pub async fn extend<'e, E>(executor: E, user_id: i64, until_ms: i64) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let updated = sqlx::query("UPDATE users SET unlocked_until = ? WHERE id = ?")
        .bind(until_ms)
        .bind(user_id)
        .execute(executor)
        .await?
        .rows_affected();

    if updated == 0 {
        return Err(AppError::UserNotFound);
    }

    Ok(())
}

/// Evaluate an account's entitlement at `now_ms`.
pub async fn entitled_now(pool: &DbPool, user_id: i64, now_ms: i64) -> Result<bool, AppError> {
    Ok(is_entitled(window(pool, user_id).await?, now_ms))
}
