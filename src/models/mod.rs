//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables.

/// Invoice and line item models
pub mod invoice;
/// Product stock model
pub mod product;
/// Unlock request model
pub mod request;
/// Unlock code model
pub mod unlock_code;
/// User account model
pub mod user;
