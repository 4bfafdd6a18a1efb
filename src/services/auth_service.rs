//! Auth service - Registration, login, and bearer token handling.
//!
//! This service handles:
//! - Password hashing and verification (Argon2)
//! - Minting and verifying signed bearer tokens
//! - Account registration and login
//! - Bootstrapping the admin account at startup
//!
//! # Token Shape
//!
//! Tokens are HS256 JWTs carrying the user id, username, and role. They
//! expire 30 days after issue; the signing key comes from configuration,
//! never from source.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    db::DbPool,
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, Role, User},
};

/// Minimum accepted password length for new accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Token lifetime: 30 days, in seconds.
pub const TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Claims carried inside a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,

    /// Username at issue time
    pub username: String,

    /// Role at issue time
    pub role: Role,

    /// Issued-at, epoch seconds
    pub iat: i64,

    /// Expiry, epoch seconds
    pub exp: i64,
}

/// Signs and verifies bearer tokens with a shared secret.
///
/// Cheap to clone; both keys are derived once from the configured secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Mint a token for `user`, valid for 30 days from `now_ms`.
    pub fn mint(&self, user: &User, now_ms: i64) -> Result<String, AppError> {
        let iat = now_ms / 1000;
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            iat,
            exp: iat + TOKEN_TTL_SECS,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| AppError::TokenCreation)
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!(error = %err, "token verification failed");
                AppError::InvalidToken
            })
    }
}

/// Hash a password with Argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::PasswordHash)?;

    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash.
///
/// Returns `Ok(false)` on mismatch; errors only if the stored hash itself
/// cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AppError::PasswordHash)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Register a new shop owner account.
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `req` - Registration request body
/// * `now_ms` - Current time, epoch milliseconds
///
/// # Errors
///
/// - `InvalidRequest`: Username empty or password too short
/// - `UsernameTaken`: Username already registered
/// - `Database`: Database error occurred
pub async fn register(pool: &DbPool, req: RegisterRequest, now_ms: i64) -> Result<User, AppError> {
    // Validate input
    let username = req.username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::InvalidRequest("Username is required".to_string()));
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::InvalidRequest(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash = hash_password(&req.password)?;

    // Insert and let the UNIQUE constraint arbitrate duplicate usernames,
    // so two concurrent registrations cannot both pass a precheck
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash, role, shop_name, shop_address, created_at)
        VALUES (?, ?, 'user', ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&username)
    .bind(&password_hash)
    .bind(req.shop_name.trim())
    .bind(req.shop_address.trim())
    .bind(now_ms)
    .fetch_one(pool)
    .await
    .map_err(|err| match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::UsernameTaken,
        other => AppError::Database(other),
    })?;

    tracing::info!(user_id = user.id, username = %user.username, "registered new account");

    Ok(user)
}

/// Authenticate a username/password pair and mint a token.
///
/// A wrong username and a wrong password return the same error, so the
/// endpoint does not leak which usernames exist.
///
/// # Errors
///
/// - `InvalidCredentials`: No such user, or password mismatch
/// - `Database`: Database error occurred
pub async fn login(
    pool: &DbPool,
    tokens: &TokenSigner,
    req: LoginRequest,
    now_ms: i64,
) -> Result<(String, User), AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(req.username.trim())
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = tokens.mint(&user, now_ms)?;

    Ok((token, user))
}

/// Fetch a user by id.
pub async fn get_user(pool: &DbPool, user_id: i64) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::UserNotFound)
}

/// Create the admin account on first startup.
///
/// Does nothing if any admin already exists, or if `ADMIN_PASSWORD` is not
/// configured. There is no hardcoded default password.
pub async fn bootstrap_admin(pool: &DbPool, config: &Config, now_ms: i64) -> Result<(), AppError> {
    let Some(password) = config.admin_password.as_deref() else {
        tracing::warn!("ADMIN_PASSWORD not set, skipping admin bootstrap");
        return Ok(());
    };

    let admin_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin')")
            .fetch_one(pool)
            .await?;

    if admin_exists {
        return Ok(());
    }

    let password_hash = hash_password(password)?;

    sqlx::query(
        r#"
        INSERT INTO users (username, password_hash, role, shop_name, shop_address, created_at)
        VALUES (?, ?, 'admin', 'Mhyasi Admin', '', ?)
        "#,
    )
    .bind(&config.admin_username)
    .bind(&password_hash)
    .bind(now_ms)
    .execute(pool)
    .await?;

    tracing::info!(username = %config.admin_username, "bootstrapped admin account");

    Ok(())
}
