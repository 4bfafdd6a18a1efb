//! Shared fixtures for the test suites.
//!
//! Seeds rows directly through SQL so service tests do not have to go
//! through the HTTP surface to arrange state.

use std::sync::OnceLock;

use crate::db::DbPool;
use crate::models::user::Role;
use crate::services::auth_service::{self, TokenSigner};

/// Password used for every seeded account.
pub const TEST_PASSWORD: &str = "password123";

static PASSWORD_HASH: OnceLock<String> = OnceLock::new();

/// Argon2 hash of [`TEST_PASSWORD`], computed once per test process.
fn test_password_hash() -> String {
    PASSWORD_HASH
        .get_or_init(|| auth_service::hash_password(TEST_PASSWORD).unwrap())
        .clone()
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn test_signer() -> TokenSigner {
    TokenSigner::new("test-secret")
}

pub async fn seed_user(
    pool: &DbPool,
    username: &str,
    role: Role,
    unlocked_until: Option<i64>,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO users (username, password_hash, role, shop_name, shop_address, unlocked_until, created_at)
        VALUES (?, ?, ?, '', '', ?, ?)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(test_password_hash())
    .bind(role)
    .bind(unlocked_until)
    .bind(now_ms())
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Mint a valid bearer token for a seeded user.
pub async fn token_for(pool: &DbPool, signer: &TokenSigner, user_id: i64) -> String {
    let user = auth_service::get_user(pool, user_id).await.unwrap();
    signer.mint(&user, now_ms()).unwrap()
}

pub async fn seed_product(
    pool: &DbPool,
    user_id: i64,
    name: &str,
    price_cents: i64,
    qty: i64,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO products (user_id, name, price_cents, qty, created_at) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(name)
    .bind(price_cents)
    .bind(qty)
    .bind(now_ms())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn product_qty(pool: &DbPool, product_id: i64) -> i64 {
    sqlx::query_scalar("SELECT qty FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn seed_code(pool: &DbPool, user_id: i64, code: &str, until: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO unlock_codes (code, user_id, created_at, until) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(code)
    .bind(user_id)
    .bind(now_ms())
    .bind(until)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_request(pool: &DbPool, user_id: i64, amount: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO requests (user_id, amount, details, created_at) VALUES (?, ?, '', ?) RETURNING id",
    )
    .bind(user_id)
    .bind(amount)
    .bind(now_ms())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn unlocked_until(pool: &DbPool, user_id: i64) -> Option<i64> {
    sqlx::query_scalar("SELECT unlocked_until FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
