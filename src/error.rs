//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Bad credentials, bad or missing tokens
/// - **Authorization Errors**: Admin-only surfaces, locked accounts, codes issued to another account
/// - **Resource Errors**: Requested resources not found
/// - **Business Logic Errors**: Operations that violate entitlement or code rules
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing or verification failed internally.
    ///
    /// Returns HTTP 500 Internal Server Error. Not to be confused with
    /// `InvalidCredentials`, which is the answer to a wrong password.
    #[error("Password hashing failed")]
    PasswordHash,

    /// Signing a new auth token failed.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Token creation failed")]
    TokenCreation,

    /// Auth token is missing, malformed, expired, or has a bad signature.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid or missing token")]
    InvalidToken,

    /// Username/password pair did not match any account.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Authenticated account is not an admin.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Admin access required")]
    AdminOnly,

    /// Account's entitlement window is missing or has elapsed.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Account locked. Request an unlock code")]
    AccountLocked,

    /// Unlock code exists but was issued to a different account.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Code was issued to a different account")]
    CodeNotYours,

    /// Requested user does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("User not found")]
    UserNotFound,

    /// Requested product does not exist or doesn't belong to the authenticated account.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Product not found")]
    ProductNotFound,

    /// Requested unlock request does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Request not found")]
    RequestNotFound,

    /// Submitted unlock code does not exist.
    ///
    /// Returns HTTP 404 Not Found. The message stays vague on purpose.
    #[error("Invalid code")]
    CodeNotFound,

    /// Username is already registered.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Username already taken")]
    UsernameTaken,

    /// Unlock request was already approved or declined.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Request already resolved")]
    RequestAlreadyResolved,

    /// Unlock code was already redeemed.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Code already used")]
    CodeAlreadyUsed,

    /// Unlock code's window has elapsed before redemption.
    ///
    /// Returns HTTP 410 Gone.
    #[error("Code expired")]
    CodeExpired,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// Payment verification is not wired to a provider in this deployment.
    ///
    /// Returns HTTP 501 Not Implemented.
    #[error("Payment verification is not configured")]
    PaymentNotConfigured,
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidToken` / `InvalidCredentials` → 401 Unauthorized
/// - `AdminOnly` / `AccountLocked` / `CodeNotYours` → 403 Forbidden
/// - `UserNotFound` / `ProductNotFound` / `RequestNotFound` / `CodeNotFound` → 404 Not Found
/// - `UsernameTaken` / `RequestAlreadyResolved` / `CodeAlreadyUsed` → 409 Conflict
/// - `CodeExpired` → 410 Gone
/// - `InvalidRequest` → 400 Bad Request
/// - `PaymentNotConfigured` → 501 Not Implemented
/// - `Database` / `PasswordHash` / `TokenCreation` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", self.to_string()),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
            AppError::AdminOnly => (StatusCode::FORBIDDEN, "admin_only", self.to_string()),
            AppError::AccountLocked => (StatusCode::FORBIDDEN, "account_locked", self.to_string()),
            AppError::CodeNotYours => (StatusCode::FORBIDDEN, "code_not_yours", self.to_string()),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found", self.to_string()),
            AppError::ProductNotFound => {
                (StatusCode::NOT_FOUND, "product_not_found", self.to_string())
            }
            AppError::RequestNotFound => {
                (StatusCode::NOT_FOUND, "request_not_found", self.to_string())
            }
            AppError::CodeNotFound => (StatusCode::NOT_FOUND, "code_not_found", self.to_string()),
            AppError::UsernameTaken => (StatusCode::CONFLICT, "username_taken", self.to_string()),
            AppError::RequestAlreadyResolved => (
                StatusCode::CONFLICT,
                "request_already_resolved",
                self.to_string(),
            ),
            AppError::CodeAlreadyUsed => {
                (StatusCode::CONFLICT, "code_already_used", self.to_string())
            }
            AppError::CodeExpired => (StatusCode::GONE, "code_expired", self.to_string()),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::PaymentNotConfigured => (
                StatusCode::NOT_IMPLEMENTED,
                "payment_not_configured",
                self.to_string(),
            ),
            AppError::Database(_) | AppError::PasswordHash | AppError::TokenCreation => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}
