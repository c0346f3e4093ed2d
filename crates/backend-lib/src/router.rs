// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router.
//!
//! Only the login routes live here. The OAuth2 authorization and callback
//! routes that `getOauth2Clients` links to belong to an external identity
//! integration, which must also insert a [`Principal`](crate::auth::Principal)
//! before `externalLogin` runs. Without one mounted in front of this router,
//! `externalLogin` always answers 401.
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{external_login, get_oauth2_clients, login};
use crate::middleware::refresh_token_on_failure;
use crate::AppState;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let base = state.settings.server.base_path.trim_end_matches('/').to_string();

    Router::new()
        .route(&format!("{base}/login"), post(login))
        .route(&format!("{base}/login/getOauth2Clients"), get(get_oauth2_clients))
        .route(&format!("{base}/login/externalLogin"), post(external_login))
        .layer(axum::middleware::from_fn_with_state(
            state.tokens.clone(),
            refresh_token_on_failure,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
