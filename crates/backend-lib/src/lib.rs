// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `Vizboard` login server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod oauth2;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{DefaultUserService, TokenUtils, UserService};
use crate::config::Settings;
use crate::oauth2::ClientRegistry;
use crate::storage::FlatFileStorage;

pub use router::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// User store collaborator
    pub users: Arc<dyn UserService>,
    /// Token signing and refresh
    pub tokens: Arc<TokenUtils>,
    /// Immutable settings
    pub settings: Arc<Settings>,
    /// Identity providers, present only when configured
    pub registry: Option<Arc<ClientRegistry>>,
}

impl AppState {
    /// Create a new application state around an existing user service
    pub fn new(users: Arc<dyn UserService>, tokens: Arc<TokenUtils>, settings: Settings) -> Self {
        let registry = settings
            .oauth2
            .as_ref()
            .map(|oauth2| Arc::new(ClientRegistry::from_settings(oauth2)));

        Self {
            users,
            tokens,
            settings: Arc::new(settings),
            registry,
        }
    }

    /// Create a new application state backed by flat-file user storage
    pub fn with_flat_file_storage(settings: Settings) -> anyhow::Result<Self> {
        let storage = FlatFileStorage::new(&settings.storage.path)?;
        let tokens = Arc::new(TokenUtils::from_settings(&settings.jwt_token));
        let users = Arc::new(DefaultUserService::new(storage, tokens.clone()));
        Ok(Self::new(users, tokens, settings))
    }
}
