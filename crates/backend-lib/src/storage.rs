// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! User storage abstraction with flat-file implementation.
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use dashmap::DashMap;
use tokio::fs as tokio_fs;

use crate::auth::User;
use crate::error::AppError;

/// Trait for user storage backends
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Look up a user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Look up a user by email, ignoring case
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Insert or replace a user
    async fn save(&self, user: &User) -> Result<(), AppError>;
}

/// Flat-file implementation of the `UserStorage` trait.
///
/// Each user lives in `<root>/users/<key>.json`, where the key is the
/// base64url form of the username so any identity name maps to a plain file
/// name. Reads go through an in-memory cache which is updated on every save.
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
    cache: Arc<DashMap<String, User>>,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("users"))?;
        Ok(Self {
            root,
            cache: Arc::new(DashMap::new()),
        })
    }

    fn user_path(&self, username: &str) -> PathBuf {
        let key = URL_SAFE_NO_PAD.encode(username.as_bytes());
        self.root.join("users").join(format!("{key}.json"))
    }

    async fn read_user(path: &Path) -> Result<User, AppError> {
        let content = tokio_fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl UserStorage for FlatFileStorage {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        if username.is_empty() {
            return Ok(None);
        }
        if let Some(user) = self.cache.get(username) {
            return Ok(Some(user.clone()));
        }

        let path = self.user_path(username);
        if !tokio_fs::try_exists(&path).await? {
            return Ok(None);
        }

        let user = Self::read_user(&path).await?;
        self.cache.insert(user.username.clone(), user.clone());
        Ok(Some(user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let mut entries = tokio_fs::read_dir(self.root.join("users")).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let user = match Self::read_user(&path).await {
                Ok(user) => user,
                Err(e) => {
                    tracing::warn!("Skipping unreadable user file {}: {e}", path.display());
                    continue;
                }
            };
            if user.email.eq_ignore_ascii_case(email) {
                self.cache.insert(user.username.clone(), user.clone());
                return Ok(Some(user));
            }
        }

        Ok(None)
    }

    async fn save(&self, user: &User) -> Result<(), AppError> {
        if user.username.is_empty() {
            return Err(AppError::Server("an empty username cannot be stored".to_string()));
        }

        let json = serde_json::to_string_pretty(user)?;
        let path = self.user_path(&user.username);
        let tmp = path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &path).await?;

        self.cache.insert(user.username.clone(), user.clone());
        Ok(())
    }
}
