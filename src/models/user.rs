//! User data models and API request/response types.
//!
//! This module defines:
//! - `User`: Database entity representing a shop owner or admin account
//! - `Role`: Account role, stored as lowercase text
//! - `RegisterRequest` / `LoginRequest`: Auth request bodies
//! - `UpdateProfileRequest`: Request body for editing shop details
//! - `UserResponse` / `LoginResponse`: Response bodies returned to clients

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Stored in the `role` column as lowercase text (`"user"` / `"admin"`).
/// Admins manage unlock requests and codes; regular users run a shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. Each user:
/// - Owns their products and invoices (rows are scoped by `user_id`)
/// - Carries the entitlement ledger inline as `unlocked_until`
///
/// # Entitlement
///
/// `unlocked_until` is an absolute expiry in epoch milliseconds. The account
/// is entitled while `unlocked_until > now`; `None` means never unlocked.
/// Nothing flips when the instant passes, readers just compare against
/// the current time.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    /// Unique identifier for this user
    pub id: i64,

    /// Login name, unique across all accounts
    pub username: String,

    /// Argon2 hash of the password. Never serialized to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account role (`user` or `admin`)
    pub role: Role,

    /// Display name of the shop
    pub shop_name: String,

    /// Street address of the shop
    pub shop_address: String,

    /// Path to an uploaded logo, if any
    pub logo_path: Option<String>,

    /// Absolute end of the entitlement window in epoch milliseconds,
    /// or `None` if the account was never unlocked
    pub unlocked_until: Option<i64>,

    /// Timestamp when the account was created (epoch milliseconds)
    pub created_at: i64,
}

/// Request body for registering a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "username": "amina",
///   "password": "correct horse battery",
///   "shop_name": "Amina's Electronics"
/// }
/// ```
///
/// # Validation
///
/// - `username`: Required, non-empty after trimming
/// - `password`: Required, at least 8 characters
/// - `shop_name` / `shop_address`: Optional, default to empty strings
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,

    pub password: String,

    #[serde(default)]
    pub shop_name: String,

    #[serde(default)]
    pub shop_address: String,
}

/// Request body for logging in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for updating shop profile details.
///
/// `logo_path` is only overwritten when provided; the shop fields are
/// replaced wholesale.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub shop_name: String,

    #[serde(default)]
    pub shop_address: String,

    pub logo_path: Option<String>,
}

/// Response body for user endpoints.
///
/// This struct is returned to API clients.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "username": "amina",
///   "role": "user",
///   "shop_name": "Amina's Electronics",
///   "shop_address": "",
///   "logo_path": null,
///   "unlocked_until": 1775000000000,
///   "created_at": 1772400000000
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User unique identifier
    pub id: i64,

    /// Login name
    pub username: String,

    /// Account role
    pub role: Role,

    /// Shop display name
    pub shop_name: String,

    /// Shop address
    pub shop_address: String,

    /// Uploaded logo path, if any
    pub logo_path: Option<String>,

    /// End of the entitlement window (epoch milliseconds), if ever unlocked
    pub unlocked_until: Option<i64>,

    /// Creation timestamp (epoch milliseconds)
    pub created_at: i64,
}

/// Convert database User to API UserResponse.
///
/// This transformation - Removes the internal `password_hash` field
impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            shop_name: user.shop_name,
            shop_address: user.shop_address,
            logo_path: user.logo_path,
            unlocked_until: user.unlocked_until,
            created_at: user.created_at,
        }
    }
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token for subsequent requests
    pub token: String,

    /// The authenticated user
    pub user: UserResponse,
}
