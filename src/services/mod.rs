//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, validation, and complex operations.

pub mod auth_service;
pub mod code_service;
pub mod entitlement_service;
pub mod invoice_service;
pub mod request_service;
