//! Product management HTTP handlers.
//!
//! This module implements the product-related API endpoints:
//! - POST /api/v1/products - Create new product
//! - GET /api/v1/products - List the shop's products
//! - PUT /api/v1/products/{id} - Update a product
//! - DELETE /api/v1/products/{id} - Delete a product
//!
//! Every query filters by the authenticated `user_id`, so one shop can
//! never see or edit another shop's stock. Reading and editing products
//! is not entitlement-gated; only recording sales is.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::product::{CreateProductRequest, Product, ProductResponse, UpdateProductRequest},
};

fn validate_product(name: &str, price_cents: i64, qty: i64) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidRequest("Name is required".to_string()));
    }
    if price_cents < 0 || qty < 0 {
        return Err(AppError::InvalidRequest(
            "Price and quantity cannot be negative".to_string(),
        ));
    }

    Ok(())
}

/// Create a new product.
///
/// # Endpoint
///
/// `POST /api/v1/products`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "USB-C cable",
///   "price_cents": 1500,
///   "qty": 40
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Returns the created product
/// - **Error (400)**: Empty name, or negative price/quantity
/// - **Error (401)**: Invalid token
pub async fn create_product(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    validate_product(&request.name, request.price_cents, request.qty)?;

    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (user_id, name, price_cents, qty, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    // Link to authenticated shop
    .bind(auth.user_id)
    .bind(request.name.trim())
    .bind(request.price_cents)
    .bind(request.qty)
    .bind(Utc::now().timestamp_millis())
    .fetch_one(&pool)
    .await?;

    // Convert Product to ProductResponse (removes user_id)
    Ok(Json(product.into()))
}

/// List the shop's products, newest first.
pub async fn list_products(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE user_id = ? ORDER BY id DESC",
    )
    // Only fetch products for the authenticated shop
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;

    let responses: Vec<ProductResponse> = products.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}

/// Update a product the shop owns.
///
/// # Response
///
/// - **Success (200 OK)**: Returns the updated product
/// - **Error (404)**: Product doesn't exist or belongs to a different shop
pub async fn update_product(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(product_id): Path<i64>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    validate_product(&request.name, request.price_cents, request.qty)?;

    // Filter by BOTH id AND user_id so a foreign product reads as absent
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET name = ?, price_cents = ?, qty = ?
        WHERE id = ? AND user_id = ?
        RETURNING *
        "#,
    )
    .bind(request.name.trim())
    .bind(request.price_cents)
    .bind(request.qty)
    .bind(product_id)
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::ProductNotFound)?;

    Ok(Json(product.into()))
}

/// Delete a product the shop owns.
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (404)**: Product doesn't exist or belongs to a different shop
pub async fn delete_product(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = sqlx::query("DELETE FROM products WHERE id = ? AND user_id = ?")
        .bind(product_id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::ProductNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
