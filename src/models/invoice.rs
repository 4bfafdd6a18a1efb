//! Invoice data models and API request/response types.
//!
//! This module defines:
//! - `Invoice`: Database entity representing a recorded sale
//! - `InvoiceItem`: One line item inside an invoice
//! - `CreateInvoiceRequest`: Request body for recording a sale
//! - `InvoiceResponse`: Response body returned to clients

use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// One line item on an invoice.
///
/// `product_id` and `qty` drive the stock decrement; `price_cents` and
/// `name` are an optional snapshot of the product at sale time, kept so
/// the invoice still renders after the product is edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Product being sold
    pub product_id: i64,

    /// Units sold. Must be at least 1.
    pub qty: i64,

    /// Unit price at sale time, if the client recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<i64>,

    /// Product name at sale time, if the client recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Represents an invoice record from the database.
///
/// # Database Table
///
/// Maps to the `invoices` table. Each invoice belongs to one shop owner
/// (via `user_id`). Invoices are immutable once written: there is no
/// update or delete surface.
///
/// # Items Storage
///
/// The line items are stored in the `items` TEXT column as JSON and
/// decoded through `sqlx::types::Json`, so the ordered list round-trips
/// exactly as submitted.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Invoice {
    /// Unique identifier for this invoice
    pub id: i64,

    /// Foreign key to the owning user
    pub user_id: i64,

    /// Client-supplied invoice number. Not required to be unique.
    pub invoice_no: String,

    /// Customer name, may be empty
    pub customer: String,

    /// Ordered line items, JSON-encoded in the database
    pub items: Json<Vec<InvoiceItem>>,

    /// Invoice total in cents, as supplied by the client
    pub total_cents: i64,

    /// Timestamp when the invoice was recorded (epoch milliseconds)
    pub created_at: i64,
}

/// Request body for recording a sale.
///
/// # JSON Example
///
/// ```json
/// {
///   "invoice_no": "INV-0042",
///   "customer": "Walk-in",
///   "items": [
///     { "product_id": 3, "qty": 2, "price_cents": 1500 }
///   ],
///   "total_cents": 3000
/// }
/// ```
///
/// # Validation
///
/// - `invoice_no`: Required, non-empty
/// - `items`: Each item's `qty` must be at least 1; the list may be empty
/// - `customer` / `total_cents`: Optional, default to `""` and 0
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub invoice_no: String,

    #[serde(default)]
    pub customer: String,

    #[serde(default)]
    pub items: Vec<InvoiceItem>,

    #[serde(default)]
    pub total_cents: i64,
}

/// Response body for invoice endpoints.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice unique identifier
    pub id: i64,

    /// Client-supplied invoice number
    pub invoice_no: String,

    /// Customer name
    pub customer: String,

    /// Ordered line items
    pub items: Vec<InvoiceItem>,

    /// Invoice total in cents
    pub total_cents: i64,

    /// Creation timestamp (epoch milliseconds)
    pub created_at: i64,
}

/// Convert database Invoice to API InvoiceResponse.
///
/// This transformation - Removes the internal `user_id` field and unwraps
/// the JSON items wrapper.
impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            invoice_no: invoice.invoice_no,
            customer: invoice.customer,
            items: invoice.items.0,
            total_cents: invoice.total_cents,
            created_at: invoice.created_at,
        }
    }
}
