//! Invoice HTTP handlers.
//!
//! This module implements the sale-recording endpoints:
//! - POST /api/v1/invoices - Record a sale (entitlement-gated)
//! - GET /api/v1/invoices - List the shop's invoices

use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::invoice::{CreateInvoiceRequest, InvoiceResponse},
    services::invoice_service,
};

/// Record a sale.
///
/// # Endpoint
///
/// `POST /api/v1/invoices`
///
/// # Response
///
/// - **Success (200 OK)**: Returns the recorded invoice
/// - **Error (400)**: Missing invoice number or a line with qty below 1
/// - **Error (403)**: Account locked; nothing is written
///
/// The invoice insert and every stock decrement commit atomically; see
/// the invoice service for the line-item semantics.
pub async fn create_invoice(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let invoice = invoice_service::create_invoice(
        &pool,
        auth.user_id,
        request,
        Utc::now().timestamp_millis(),
    )
    .await?;

    Ok(Json(invoice.into()))
}

/// List the shop's invoices, newest first.
pub async fn list_invoices(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    let invoices = invoice_service::list_invoices(&pool, auth.user_id).await?;

    let responses: Vec<InvoiceResponse> = invoices.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}
