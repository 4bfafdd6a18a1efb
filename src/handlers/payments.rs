//! Payment verification HTTP handler.
//!
//! The hosted deployment verifies gateway payments here before an unlock
//! request is auto-approved. This build ships without a payment provider,
//! so the endpoint exists but always declines; unlocks go through the
//! manual request/approve flow instead.

use crate::error::AppError;

/// Answer every verification attempt with 501 Not Implemented.
pub async fn verify_payment() -> AppError {
    AppError::PaymentNotConfigured
}
