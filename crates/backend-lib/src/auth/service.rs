use async_trait::async_trait;
use vizboard_common::LoginRequest;

use super::{OAuth2Identity, User};
use crate::error::AppError;

/// User-store operations the login endpoints depend on
#[async_trait]
pub trait UserService: Send + Sync {
    /// Resolve an account by username or email and check its password
    async fn user_login(&self, request: &LoginRequest) -> Result<User, AppError>;

    /// Find the local account linked to a federated identity, creating it on first use
    async fn external_register(&self, identity: &OAuth2Identity) -> Result<User, AppError>;

    /// Activate the account a token was issued for, without a password login
    async fn activate_user_no_login(&self, token: &str) -> Result<User, AppError>;
}
