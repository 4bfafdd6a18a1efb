//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Performs business logic (database queries, validation)
//! 3. Returns HTTP response (JSON, status code)

/// Admin-only endpoints (requests, codes)
pub mod admin;
/// Registration and login endpoints
pub mod auth;
/// Health check endpoint
pub mod health;
/// Invoice endpoints
pub mod invoices;
/// Payment verification stub
pub mod payments;
/// Product management endpoints
pub mod products;
/// Shop profile endpoints
pub mod profile;
/// Unlock request and redemption endpoints
pub mod unlock;
