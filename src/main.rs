//! Mhyasi Store - Main Application Entry Point
//!
//! This is a REST API server for small retail shops: product stock, sale
//! invoices, and a payment-gated entitlement system. Each account carries
//! an entitlement window; recording sales requires a live window, and
//! windows are granted through an admin-approved unlock-code flow.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: SQLite with sqlx (async queries)
//! - **Authentication**: Bearer tokens (HS256 JWT), Argon2 password hashes
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Bootstrap the admin account if configured and absent
//! 5. Build HTTP router with routes and middleware
//! 6. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;
#[cfg(test)]
mod test_support;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use chrono::Utc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the full router against the given state.
///
/// Kept separate from `main` so the test suites can drive the router
/// in-process without binding a socket.
fn app(state: AppState) -> Router {
    // Admin-only routes; require_admin runs after the outer auth layer
    // has inserted the AuthContext
    let admin_routes = Router::new()
        .route("/api/v1/admin/requests", get(handlers::admin::list_requests))
        .route(
            "/api/v1/admin/requests/{id}/approve",
            post(handlers::admin::approve_request),
        )
        .route(
            "/api/v1/admin/requests/{id}/decline",
            post(handlers::admin::decline_request),
        )
        .route("/api/v1/admin/codes", get(handlers::admin::list_codes))
        .route_layer(axum_middleware::from_fn(middleware::auth::require_admin));

    // Create authenticated routes (API endpoints)
    let authenticated_routes = Router::new()
        // Shop profile routes
        .route("/api/v1/profile", get(handlers::profile::get_profile))
        .route("/api/v1/profile", put(handlers::profile::update_profile))
        // Product management routes
        .route("/api/v1/products", post(handlers::products::create_product))
        .route("/api/v1/products", get(handlers::products::list_products))
        .route(
            "/api/v1/products/{id}",
            put(handlers::products::update_product),
        )
        .route(
            "/api/v1/products/{id}",
            delete(handlers::products::delete_product),
        )
        // Invoice routes
        .route("/api/v1/invoices", post(handlers::invoices::create_invoice))
        .route("/api/v1/invoices", get(handlers::invoices::list_invoices))
        // Unlock flow routes
        .route(
            "/api/v1/unlock/requests",
            post(handlers::unlock::submit_request),
        )
        .route("/api/v1/unlock/redeem", post(handlers::unlock::redeem_code))
        // Payment verification stub
        .route(
            "/api/v1/payments/verify",
            post(handlers::payments::verify_payment),
        )
        // Admin routes share the same auth layer
        .merge(admin_routes)
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    // Combine authenticated routes with public routes
    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        // Merge authenticated routes
        .merge(authenticated_routes)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // The dashboard frontend is served from a different origin
        .layer(CorsLayer::permissive())
        // Share state with all handlers via State extraction
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Create the admin account on first startup, if configured
    services::auth_service::bootstrap_admin(&pool, &config, Utc::now().timestamp_millis()).await?;

    let state = AppState {
        pool,
        tokens: services::auth_service::TokenSigner::new(&config.token_secret),
    };

    let app = app(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
