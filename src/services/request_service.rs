//! Request service - Submitting and resolving unlock requests.
//!
//! A request is the paper trail between "shop owner paid" and "shop owner
//! can use the app again". It starts pending and resolves exactly once:
//! approval issues an unlock code in the same transaction as the status
//! flip, decline just flips the status.
//!
//! # Window Arithmetic
//!
//! Approval windows use flat units: a day is 86 400 seconds, a month is
//! 30 days, a year is 365 days. Approving "2 months" always grants
//! exactly 5 184 000 000 milliseconds, whatever the calendar says.

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        request::{DurationUnit, RequestStatus, SubmitUnlockRequest, UnlockRequest, UnlockRequestWithUser},
        unlock_code::UnlockCode,
    },
    services::code_service,
};

/// Seconds in a flat day.
pub const DAY_SECS: i64 = 86_400;

/// Length of an approval window in milliseconds.
///
/// `None` when the window would overflow an `i64` millisecond count.
pub fn window_millis(duration: i64, unit: DurationUnit) -> Option<i64> {
    let unit_secs = match unit {
        DurationUnit::Days => DAY_SECS,
        DurationUnit::Months => 30 * DAY_SECS,
        DurationUnit::Years => 365 * DAY_SECS,
    };

    duration.checked_mul(unit_secs)?.checked_mul(1000)
}

/// Result of a successful approval.
#[derive(Debug)]
pub struct Approval {
    /// The code issued for the requester
    pub code: UnlockCode,

    /// Username of the requester the code is bound to
    pub for_username: String,
}

/// Submit a new unlock request for the authenticated account.
pub async fn submit_request(
    pool: &DbPool,
    user_id: i64,
    req: SubmitUnlockRequest,
    now_ms: i64,
) -> Result<UnlockRequest, AppError> {
    let request = sqlx::query_as::<_, UnlockRequest>(
        r#"
        INSERT INTO requests (user_id, amount, details, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(req.amount)
    .bind(req.details.trim())
    .bind(now_ms)
    .fetch_one(pool)
    .await?;

    tracing::info!(request_id = request.id, user_id, "unlock request submitted");

    Ok(request)
}

/// List every request with its submitter's username, newest first.
pub async fn list_requests(pool: &DbPool) -> Result<Vec<UnlockRequestWithUser>, AppError> {
    let requests = sqlx::query_as::<_, UnlockRequestWithUser>(
        r#"
        SELECT r.id, r.user_id, u.username, r.amount, r.details, r.status, r.created_at
        FROM requests r
        JOIN users u ON u.id = r.user_id
        ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

/// Approve a pending request and issue an unlock code for its submitter.
///
/// The granted window starts at `now_ms` (approval time, not submission
/// time) and ends `duration * unit` later. The code is issued in the same
/// transaction that flips the status, so there is no state where a
/// request is approved but codeless.
///
/// Approval does not touch the requester's entitlement; the window only
/// lands on the account when the code is redeemed.
///
/// # Errors
///
/// - `InvalidRequest`: Duration below 1, or a window too large for an i64
/// - `RequestNotFound`: No such request
/// - `RequestAlreadyResolved`: Request was already approved or declined
/// - `Database`: Database error occurred
pub async fn approve_request(
    pool: &DbPool,
    request_id: i64,
    duration: i64,
    unit: DurationUnit,
    now_ms: i64,
) -> Result<Approval, AppError> {
    // Validate duration
    if duration < 1 {
        return Err(AppError::InvalidRequest(
            "Duration must be at least 1".to_string(),
        ));
    }
    let until = window_millis(duration, unit)
        .and_then(|window| now_ms.checked_add(window))
        .ok_or_else(|| AppError::InvalidRequest("Duration is too large".to_string()))?;

    let request = sqlx::query_as::<_, UnlockRequestWithUser>(
        r#"
        SELECT r.id, r.user_id, u.username, r.amount, r.details, r.status, r.created_at
        FROM requests r
        JOIN users u ON u.id = r.user_id
        WHERE r.id = ?
        "#,
    )
    .bind(request_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::RequestNotFound)?;

    if request.status != RequestStatus::Pending {
        return Err(AppError::RequestAlreadyResolved);
    }

    // Start database transaction
    let mut tx = pool.begin().await?;

    // Flip the status with a conditional update; zero rows means another
    // admin resolved it after our read
    let flipped =
        sqlx::query("UPDATE requests SET status = 'approved' WHERE id = ? AND status = 'pending'")
            .bind(request_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

    if flipped == 0 {
        tx.rollback().await?;
        return Err(AppError::RequestAlreadyResolved);
    }

    // Issue the code for the submitter, never for the approving admin
    let code = code_service::issue(&mut tx, request.user_id, until, now_ms).await?;

    // Commit all changes atomically
    tx.commit().await?;

    tracing::info!(
        request_id,
        user_id = request.user_id,
        until,
        "request approved, code issued"
    );

    Ok(Approval {
        code,
        for_username: request.username,
    })
}

/// Decline a pending request. No code is issued, nothing else changes.
///
/// # Errors
///
/// - `RequestNotFound`: No such request
/// - `RequestAlreadyResolved`: Request was already approved or declined
/// - `Database`: Database error occurred
pub async fn decline_request(pool: &DbPool, request_id: i64) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM requests WHERE id = ?)")
        .bind(request_id)
        .fetch_one(pool)
        .await?;

    if !exists {
        return Err(AppError::RequestNotFound);
    }

    let flipped =
        sqlx::query("UPDATE requests SET status = 'declined' WHERE id = ? AND status = 'pending'")
            .bind(request_id)
            .execute(pool)
            .await?
            .rows_affected();

    if flipped == 0 {
        return Err(AppError::RequestAlreadyResolved);
    }

    tracing::info!(request_id, "request declined");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::test_support::{seed_request, seed_user, unlocked_until};
    use sqlx::SqlitePool;

    const NOW: i64 = 1_772_400_000_000;

    #[test]
    fn test_window_millis_flat_units() {
        assert_eq!(window_millis(1, DurationUnit::Days), Some(86_400_000));
        assert_eq!(window_millis(7, DurationUnit::Days), Some(604_800_000));
        // A month is exactly 30 flat days
        assert_eq!(window_millis(1, DurationUnit::Months), Some(2_592_000_000));
        assert_eq!(window_millis(2, DurationUnit::Months), Some(5_184_000_000));
        // A year is exactly 365 flat days
        assert_eq!(window_millis(1, DurationUnit::Years), Some(31_536_000_000));
    }

    #[test]
    fn test_window_millis_overflow_is_none() {
        assert_eq!(window_millis(300_000_000_000, DurationUnit::Years), None);
        assert_eq!(window_millis(i64::MAX, DurationUnit::Days), None);
    }

    async fn code_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM unlock_codes")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test]
    async fn test_submit_creates_pending_request(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;

        let request = submit_request(
            &pool,
            user_id,
            SubmitUnlockRequest {
                amount: 5000,
                details: "  paid via transfer  ".to_string(),
            },
            NOW,
        )
        .await
        .unwrap();

        assert_eq!(request.user_id, user_id);
        assert_eq!(request.amount, 5000);
        assert_eq!(request.details, "paid via transfer");
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.created_at, NOW);
    }

    #[sqlx::test]
    async fn test_approve_issues_code_for_submitter(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        let request_id = seed_request(&pool, user_id, 5000).await;

        let approval = approve_request(&pool, request_id, 2, DurationUnit::Months, NOW)
            .await
            .unwrap();

        assert_eq!(approval.for_username, "amina");
        assert_eq!(approval.code.user_id, user_id);
        // Window starts at approval time, flat arithmetic
        assert_eq!(approval.code.until, NOW + 5_184_000_000);
        assert!(!approval.code.used);

        let status: RequestStatus =
            sqlx::query_scalar("SELECT status FROM requests WHERE id = ?")
                .bind(request_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, RequestStatus::Approved);

        // Approval issues a code but grants nothing until it is redeemed
        assert_eq!(unlocked_until(&pool, user_id).await, None);
    }

    #[sqlx::test]
    async fn test_approve_rejects_zero_duration(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        let request_id = seed_request(&pool, user_id, 5000).await;

        let err = approve_request(&pool, request_id, 0, DurationUnit::Days, NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert_eq!(code_count(&pool).await, 0);
    }

    #[sqlx::test]
    async fn test_approve_rejects_oversized_duration(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        let request_id = seed_request(&pool, user_id, 5000).await;

        let err = approve_request(&pool, request_id, 300_000_000_000, DurationUnit::Years, NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert_eq!(code_count(&pool).await, 0);

        // The request is untouched and still approvable
        let status: RequestStatus = sqlx::query_scalar("SELECT status FROM requests WHERE id = ?")
            .bind(request_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, RequestStatus::Pending);
    }

    #[sqlx::test]
    async fn test_approve_unknown_request(pool: SqlitePool) {
        let err = approve_request(&pool, 999, 1, DurationUnit::Days, NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RequestNotFound));
    }

    #[sqlx::test]
    async fn test_approve_twice_issues_one_code(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        let request_id = seed_request(&pool, user_id, 5000).await;

        approve_request(&pool, request_id, 1, DurationUnit::Days, NOW)
            .await
            .unwrap();
        let err = approve_request(&pool, request_id, 1, DurationUnit::Days, NOW)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RequestAlreadyResolved));
        assert_eq!(code_count(&pool).await, 1);
    }

    #[sqlx::test]
    async fn test_approve_after_decline(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        let request_id = seed_request(&pool, user_id, 5000).await;

        decline_request(&pool, request_id).await.unwrap();
        let err = approve_request(&pool, request_id, 1, DurationUnit::Days, NOW)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RequestAlreadyResolved));
        assert_eq!(code_count(&pool).await, 0);
    }

    #[sqlx::test]
    async fn test_decline_flips_status_and_nothing_else(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        let request_id = seed_request(&pool, user_id, 5000).await;

        decline_request(&pool, request_id).await.unwrap();

        let status: RequestStatus =
            sqlx::query_scalar("SELECT status FROM requests WHERE id = ?")
                .bind(request_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, RequestStatus::Declined);
        assert_eq!(code_count(&pool).await, 0);
        assert_eq!(unlocked_until(&pool, user_id).await, None);
    }

    #[sqlx::test]
    async fn test_decline_after_approve(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        let request_id = seed_request(&pool, user_id, 5000).await;

        approve_request(&pool, request_id, 7, DurationUnit::Days, NOW)
            .await
            .unwrap();
        let err = decline_request(&pool, request_id).await.unwrap_err();
        assert!(matches!(err, AppError::RequestAlreadyResolved));

        // The approval stands untouched
        let status: RequestStatus = sqlx::query_scalar("SELECT status FROM requests WHERE id = ?")
            .bind(request_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, RequestStatus::Approved);
        assert_eq!(code_count(&pool).await, 1);
    }

    #[sqlx::test]
    async fn test_decline_twice(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        let request_id = seed_request(&pool, user_id, 5000).await;

        decline_request(&pool, request_id).await.unwrap();
        let err = decline_request(&pool, request_id).await.unwrap_err();
        assert!(matches!(err, AppError::RequestAlreadyResolved));
    }

    #[sqlx::test]
    async fn test_decline_unknown_request(pool: SqlitePool) {
        let err = decline_request(&pool, 999).await.unwrap_err();
        assert!(matches!(err, AppError::RequestNotFound));
    }

    #[sqlx::test]
    async fn test_list_requests_newest_first_with_usernames(pool: SqlitePool) {
        let amina = seed_user(&pool, "amina", Role::User, None).await;
        let bayo = seed_user(&pool, "bayo", Role::User, None).await;
        let first = seed_request(&pool, amina, 1000).await;
        let second = seed_request(&pool, bayo, 2000).await;

        let requests = list_requests(&pool).await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].id, second);
        assert_eq!(requests[0].username, "bayo");
        assert_eq!(requests[1].id, first);
        assert_eq!(requests[1].username, "amina");
    }
}
