//! Invoice service - Recording sales and decrementing stock.
//!
//! Recording a sale is the one entitlement-gated operation in the system:
//! a locked account gets `AccountLocked` and writes nothing. For an
//! entitled account the invoice insert and every stock decrement commit
//! in a single database transaction.
//!
//! # Stock Semantics
//!
//! Each line item decrements its product's `qty`, clamped at zero so an
//! oversell empties the shelf instead of going negative. Line items whose
//! `product_id` does not exist, or belongs to another shop, stay on the
//! invoice but move no stock.

use sqlx::types::Json;

use crate::{
    db::DbPool,
    error::AppError,
    models::invoice::{CreateInvoiceRequest, Invoice},
    services::entitlement_service,
};

/// Record a sale for the authenticated account.
///
/// # Process
///
/// 1. Validate the request body
/// 2. Evaluate the entitlement gate at `now_ms`
/// 3. Start database transaction
/// 4. Insert the invoice with its line items as JSON
/// 5. Decrement stock per line, clamped at zero, scoped to the owner
/// 6. Commit (or rollback on error)
///
/// # Errors
///
/// - `InvalidRequest`: Missing invoice number, or a line with qty below 1
/// - `AccountLocked`: Entitlement window missing or elapsed
/// - `UserNotFound`: Authenticated account no longer exists
/// - `Database`: Database error occurred
pub async fn create_invoice(
    pool: &DbPool,
    user_id: i64,
    req: CreateInvoiceRequest,
    now_ms: i64,
) -> Result<Invoice, AppError> {
    // Validate input
    let invoice_no = req.invoice_no.trim().to_string();
    if invoice_no.is_empty() {
        return Err(AppError::InvalidRequest(
            "Missing invoice number".to_string(),
        ));
    }
    if req.items.iter().any(|item| item.qty < 1) {
        return Err(AppError::InvalidRequest(
            "Item quantity must be at least 1".to_string(),
        ));
    }

    // Entitlement gate: locked accounts record nothing
    if !entitlement_service::entitled_now(pool, user_id, now_ms).await? {
        return Err(AppError::AccountLocked);
    }

    // Start database transaction
    let mut tx = pool.begin().await?;

    let invoice = sqlx::query_as::<_, Invoice>(
        r#"
        INSERT INTO invoices (user_id, invoice_no, customer, items, total_cents, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&invoice_no)
    .bind(req.customer.trim())
    .bind(Json(&req.items))
    .bind(req.total_cents)
    .bind(now_ms)
    .fetch_one(&mut *tx)
    .await?;

    // Decrement stock per line, clamped at zero. Owner scoping means a
    // missing or foreign product matches no row: the line stays on the
    // invoice but moves no stock, and the sale still goes through.
    for item in &req.items {
        let updated =
            sqlx::query("UPDATE products SET qty = MAX(qty - ?, 0) WHERE id = ? AND user_id = ?")
                .bind(item.qty)
                .bind(item.product_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        if updated == 0 {
            tracing::debug!(
                product_id = item.product_id,
                user_id,
                "invoice line matched no product, stock untouched"
            );
        }
    }

    // Commit all changes atomically
    tx.commit().await?;

    tracing::info!(
        invoice_id = invoice.id,
        user_id,
        total_cents = invoice.total_cents,
        "invoice recorded"
    );

    Ok(invoice)
}

/// List the account's invoices, newest first.
pub async fn list_invoices(pool: &DbPool, user_id: i64) -> Result<Vec<Invoice>, AppError> {
    let invoices =
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE user_id = ? ORDER BY id DESC")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(invoices)
}
