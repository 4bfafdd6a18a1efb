//! Shared application state.

use axum::extract::FromRef;

use crate::{db::DbPool, services::auth_service::TokenSigner};

/// State shared by every route.
///
/// `FromRef` lets each extractor pull just the piece it needs: handlers
/// take `State<DbPool>`, the auth middleware takes `State<TokenSigner>`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: DbPool,
    pub tokens: TokenSigner,
}
