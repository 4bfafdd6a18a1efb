//! Code service - Issuing, listing, and redeeming unlock codes.
//!
//! An unlock code is a single-use token bound to one account. It is born
//! inside an approval's transaction, carries the absolute expiry of the
//! window it grants, and burns exactly once on redemption.
//!
//! # Redemption Ordering
//!
//! Redeem failures are reported in a fixed order: unknown code, then
//! wrong account, then already used, then expired. A code that is both
//! used and expired reports "already used".

use rand::Rng;
use sqlx::{Sqlite, Transaction};

use crate::{
    db::DbPool,
    error::AppError,
    models::unlock_code::{UnlockCode, UnlockCodeWithUser},
    services::entitlement_service,
};

/// Prefix carried by every generated code.
pub const CODE_PREFIX: &str = "UNLK-";

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LENGTH: usize = 16;

/// Generate a fresh code: `UNLK-` plus 16 characters from `[A-Z0-9]`.
///
/// Drawn from the thread-local CSPRNG; 36^16 possibilities make blind
/// guessing and collisions both irrelevant in practice. The `unlock_codes`
/// table still carries a UNIQUE constraint as a backstop.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect();

    format!("{CODE_PREFIX}{suffix}")
}

/// Issue a new code for `user_id`, granting a window that ends at `until_ms`.
///
/// Runs on the caller's transaction: approval flips the request status and
/// issues the code atomically, so a failed insert also unwinds the flip.
pub async fn issue(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    until_ms: i64,
    now_ms: i64,
) -> Result<UnlockCode, AppError> {
    let code = generate_code();

    let record = sqlx::query_as::<_, UnlockCode>(
        r#"
        INSERT INTO unlock_codes (code, user_id, created_at, until)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&code)
    .bind(user_id)
    .bind(now_ms)
    .bind(until_ms)
    .fetch_one(&mut **tx)
    .await?;

    Ok(record)
}

/// List every issued code with the username it was issued for, newest first.
pub async fn list_codes(pool: &DbPool) -> Result<Vec<UnlockCodeWithUser>, AppError> {
    let codes = sqlx::query_as::<_, UnlockCodeWithUser>(
        r#"
        SELECT c.id, c.code, c.user_id, u.username AS for_username,
               c.created_at, c.until, c.used, c.used_by, c.used_at
        FROM unlock_codes c
        JOIN users u ON u.id = c.user_id
        ORDER BY c.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(codes)
}

/// Redeem a code for the authenticated account.
///
/// On success the code is burned and the account's entitlement expiry is
/// overwritten with the code's `until`. Redeeming late does not stretch
/// the window; the account gets whatever remains of it.
///
/// # Errors
///
/// - `CodeNotFound`: No such code
/// - `CodeNotYours`: Code was issued to a different account
/// - `CodeAlreadyUsed`: Code already burned (also wins over expiry)
/// - `CodeExpired`: Code's window elapsed before redemption
/// - `Database`: Database error occurred
pub async fn redeem(
    pool: &DbPool,
    user_id: i64,
    code: &str,
    now_ms: i64,
) -> Result<UnlockCode, AppError> {
    let record = sqlx::query_as::<_, UnlockCode>("SELECT * FROM unlock_codes WHERE code = ?")
        .bind(code.trim())
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::CodeNotFound)?;

    // The check order is part of the contract
    if record.user_id != user_id {
        return Err(AppError::CodeNotYours);
    }
    if record.used {
        return Err(AppError::CodeAlreadyUsed);
    }
    if record.until <= now_ms {
        return Err(AppError::CodeExpired);
    }

    // Start database transaction
    let mut tx = pool.begin().await?;

    // Burn the code with a conditional update; zero rows means a
    // concurrent redeem won the race after our read
    let burned = sqlx::query(
        "UPDATE unlock_codes SET used = 1, used_by = ?, used_at = ? WHERE id = ? AND used = 0",
    )
    .bind(user_id)
    .bind(now_ms)
    .bind(record.id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if burned == 0 {
        tx.rollback().await?;
        return Err(AppError::CodeAlreadyUsed);
    }

    // Grant the window in the same transaction as the burn
    entitlement_service::extend(&mut *tx, record.user_id, record.until).await?;

    // Commit all changes atomically
    tx.commit().await?;

    tracing::info!(
        code_id = record.id,
        user_id,
        until = record.until,
        "unlock code redeemed"
    );

    Ok(UnlockCode {
        used: true,
        used_by: Some(user_id),
        used_at: Some(now_ms),
        ..record
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::test_support::{seed_code, seed_user, unlocked_until};
    use sqlx::SqlitePool;

    const NOW: i64 = 1_772_400_000_000;

    #[test]
    fn test_generated_code_shape() {
        let code = generate_code();
        assert!(code.starts_with(CODE_PREFIX));
        let suffix = &code[CODE_PREFIX.len()..];
        assert_eq!(suffix.len(), CODE_LENGTH);
        assert!(
            suffix
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        );
    }

    #[test]
    fn test_generated_codes_differ() {
        assert_ne!(generate_code(), generate_code());
    }

    #[sqlx::test]
    async fn test_issue_inside_transaction(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;

        let mut tx = pool.begin().await.unwrap();
        let code = issue(&mut tx, user_id, NOW + 1000, NOW).await.unwrap();
        tx.commit().await.unwrap();

        assert!(code.code.starts_with(CODE_PREFIX));
        assert_eq!(code.user_id, user_id);
        assert_eq!(code.until, NOW + 1000);
        assert!(!code.used);
        assert_eq!(code.used_by, None);
    }

    #[sqlx::test]
    async fn test_redeem_burns_code_and_grants_window(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        let until = NOW + 5_000_000;
        seed_code(&pool, user_id, "UNLK-TESTCODE0000001", until).await;

        let redeemed = redeem(&pool, user_id, "UNLK-TESTCODE0000001", NOW)
            .await
            .unwrap();
        assert!(redeemed.used);
        assert_eq!(redeemed.used_by, Some(user_id));
        assert_eq!(redeemed.used_at, Some(NOW));
        assert_eq!(redeemed.until, until);

        // The ledger now ends exactly where the code said, and the stored
        // row matches what was returned
        assert_eq!(unlocked_until(&pool, user_id).await, Some(until));
        let stored: UnlockCode = sqlx::query_as("SELECT * FROM unlock_codes WHERE code = ?")
            .bind("UNLK-TESTCODE0000001")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(stored.used);
        assert_eq!(stored.used_by, Some(user_id));
        assert_eq!(stored.used_at, Some(NOW));
    }

    #[sqlx::test]
    async fn test_redeem_overwrites_longer_window(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, Some(NOW + 10_000_000)).await;
        seed_code(&pool, user_id, "UNLK-TESTCODE0000002", NOW + 5_000_000).await;

        redeem(&pool, user_id, "UNLK-TESTCODE0000002", NOW)
            .await
            .unwrap();

        // Overwrite semantics: the shorter grant replaces the longer one
        assert_eq!(unlocked_until(&pool, user_id).await, Some(NOW + 5_000_000));
    }

    #[sqlx::test]
    async fn test_redeem_unknown_code(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        let err = redeem(&pool, user_id, "UNLK-DOESNOTEXIST000", NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CodeNotFound));
    }

    #[sqlx::test]
    async fn test_redeem_someone_elses_code(pool: SqlitePool) {
        let owner = seed_user(&pool, "amina", Role::User, None).await;
        let thief = seed_user(&pool, "bayo", Role::User, None).await;
        seed_code(&pool, owner, "UNLK-TESTCODE0000003", NOW + 1_000_000).await;

        let err = redeem(&pool, thief, "UNLK-TESTCODE0000003", NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CodeNotYours));

        // Nothing burned, nothing granted
        let used: bool = sqlx::query_scalar("SELECT used FROM unlock_codes WHERE code = ?")
            .bind("UNLK-TESTCODE0000003")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(!used);
        assert_eq!(unlocked_until(&pool, thief).await, None);
        assert_eq!(unlocked_until(&pool, owner).await, None);
    }

    #[sqlx::test]
    async fn test_redeem_twice(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        seed_code(&pool, user_id, "UNLK-TESTCODE0000004", NOW + 1_000_000).await;

        redeem(&pool, user_id, "UNLK-TESTCODE0000004", NOW)
            .await
            .unwrap();
        let err = redeem(&pool, user_id, "UNLK-TESTCODE0000004", NOW + 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CodeAlreadyUsed));
    }

    #[sqlx::test]
    async fn test_redeem_expired_code(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        seed_code(&pool, user_id, "UNLK-TESTCODE0000005", NOW - 1).await;

        let err = redeem(&pool, user_id, "UNLK-TESTCODE0000005", NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CodeExpired));

        // An expired code is not burned and grants nothing
        let used: bool = sqlx::query_scalar("SELECT used FROM unlock_codes WHERE code = ?")
            .bind("UNLK-TESTCODE0000005")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(!used);
        assert_eq!(unlocked_until(&pool, user_id).await, None);
    }

    #[sqlx::test]
    async fn test_redeem_at_expiry_instant(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        seed_code(&pool, user_id, "UNLK-TESTCODE0000010", NOW).await;

        // until == now is already expired, the same exclusive boundary as
        // the entitlement window itself
        let err = redeem(&pool, user_id, "UNLK-TESTCODE0000010", NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CodeExpired));
        assert_eq!(unlocked_until(&pool, user_id).await, None);
    }

    #[sqlx::test]
    async fn test_used_wins_over_expired(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        seed_code(&pool, user_id, "UNLK-TESTCODE0000006", NOW - 1).await;
        sqlx::query("UPDATE unlock_codes SET used = 1, used_by = ?, used_at = ? WHERE code = ?")
            .bind(user_id)
            .bind(NOW - 500)
            .bind("UNLK-TESTCODE0000006")
            .execute(&pool)
            .await
            .unwrap();

        let err = redeem(&pool, user_id, "UNLK-TESTCODE0000006", NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CodeAlreadyUsed));
    }

    #[sqlx::test]
    async fn test_redeem_trims_whitespace(pool: SqlitePool) {
        let user_id = seed_user(&pool, "amina", Role::User, None).await;
        seed_code(&pool, user_id, "UNLK-TESTCODE0000007", NOW + 1_000_000).await;

        let redeemed = redeem(&pool, user_id, "  UNLK-TESTCODE0000007  ", NOW)
            .await
            .unwrap();
        assert!(redeemed.used);
    }

    #[sqlx::test]
    async fn test_list_codes_newest_first_with_usernames(pool: SqlitePool) {
        let amina = seed_user(&pool, "amina", Role::User, None).await;
        let bayo = seed_user(&pool, "bayo", Role::User, None).await;
        seed_code(&pool, amina, "UNLK-TESTCODE0000008", NOW + 1000).await;
        seed_code(&pool, bayo, "UNLK-TESTCODE0000009", NOW + 2000).await;

        let codes = list_codes(&pool).await.unwrap();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0].code, "UNLK-TESTCODE0000009");
        assert_eq!(codes[0].for_username, "bayo");
        assert_eq!(codes[1].code, "UNLK-TESTCODE0000008");
        assert_eq!(codes[1].for_username, "amina");
    }
}
