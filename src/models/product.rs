//! Product data models and API request/response types.
//!
//! This module defines:
//! - `Product`: Database entity representing a stock item
//! - `CreateProductRequest` / `UpdateProductRequest`: Request bodies
//! - `ProductResponse`: Response body returned to clients

use serde::{Deserialize, Serialize};

/// Represents a product record from the database.
///
/// # Database Table
///
/// Maps to the `products` table. Each product belongs to one shop owner
/// (via `user_id`); every query filters by owner so one shop cannot read
/// or decrement another shop's stock.
///
/// # Price Storage
///
/// Prices are stored as `i64` cents to avoid floating-point precision issues.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Product {
    /// Unique identifier for this product
    pub id: i64,

    /// Foreign key to the owning user
    pub user_id: i64,

    /// Product name
    pub name: String,

    /// Unit price in cents (not dollars)
    pub price_cents: i64,

    /// Units currently in stock. Never below zero.
    pub qty: i64,

    /// Timestamp when the product was created (epoch milliseconds)
    pub created_at: i64,
}

/// Request body for creating a new product.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "USB-C cable",
///   "price_cents": 1500,
///   "qty": 40
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,

    #[serde(default)]
    pub price_cents: i64,

    #[serde(default)]
    pub qty: i64,
}

/// Request body for updating a product. All fields are replaced.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,

    #[serde(default)]
    pub price_cents: i64,

    #[serde(default)]
    pub qty: i64,
}

/// Response body for product endpoints.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    /// Product unique identifier
    pub id: i64,

    /// Product name
    pub name: String,

    /// Unit price in cents
    pub price_cents: i64,

    /// Units in stock
    pub qty: i64,

    /// Creation timestamp (epoch milliseconds)
    pub created_at: i64,
}

/// Convert database Product to API ProductResponse.
///
/// This transformation - Removes the internal `user_id` field
impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price_cents: product.price_cents,
            qty: product.qty,
            created_at: product.created_at,
        }
    }
}
