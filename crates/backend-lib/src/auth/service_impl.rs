use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use vizboard_common::LoginRequest;

use super::{
    hash_password_secure, token_generator::generate_secret, verify_password_blocking,
    OAuth2Identity, TokenUtils, User, UserService,
};
use crate::error::AppError;
use crate::storage::UserStorage;

const USER_NOT_FOUND: &str = "user is not found";
const WRONG_CREDENTIALS: &str = "username or password is wrong";
const INVALID_ACTIVATE_TOKEN: &str = "the activate token is invalid";

/// `UserService` backed by a `UserStorage`
pub struct DefaultUserService<S> {
    storage: S,
    tokens: Arc<TokenUtils>,
}

impl<S: UserStorage> DefaultUserService<S> {
    pub fn new(storage: S, tokens: Arc<TokenUtils>) -> Self {
        Self { storage, tokens }
    }

    async fn find_by_username_or_email(&self, name: &str) -> Result<Option<User>, AppError> {
        match self.storage.find_by_username(name).await? {
            Some(user) => Ok(Some(user)),
            None => self.storage.find_by_email(name).await,
        }
    }
}

#[async_trait]
impl<S: UserStorage> UserService for DefaultUserService<S> {
    async fn user_login(&self, request: &LoginRequest) -> Result<User, AppError> {
        let user = self
            .find_by_username_or_email(&request.username)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

        if !verify_password_blocking(user.password.clone(), request.password.clone()).await? {
            return Err(AppError::Server(WRONG_CREDENTIALS.to_string()));
        }

        Ok(user)
    }

    async fn external_register(&self, identity: &OAuth2Identity) -> Result<User, AppError> {
        if let Some(user) = self.storage.find_by_username(&identity.name).await? {
            return Ok(user);
        }

        let mut secret = generate_secret();
        let password =
            hash_password_secure(&mut secret).map_err(|e| AppError::Internal(e.to_string()))?;
        let email = identity.attribute("email").unwrap_or(&identity.name);

        let mut user = User::new(identity.name.clone(), email, password);
        user.name = identity.attribute("name").map(str::to_string);
        user.avatar = identity.attribute("avatar_url").map(str::to_string);

        self.storage.save(&user).await?;
        info!(
            "Registered user {} from {} identity",
            user.username, identity.registration_id
        );

        Ok(user)
    }

    async fn activate_user_no_login(&self, token: &str) -> Result<User, AppError> {
        let username = self
            .tokens
            .username(token)
            .map_err(|_| AppError::Server(INVALID_ACTIVATE_TOKEN.to_string()))?;

        let mut user = self
            .storage
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

        if !self.tokens.validate_token(token, &user.token_entity()) {
            return Err(AppError::Server(INVALID_ACTIVATE_TOKEN.to_string()));
        }

        if user.active {
            debug!("User {} is already active", user.username);
            return Ok(user);
        }

        user.active = true;
        self.storage.save(&user).await?;
        info!("Activated user {}", user.username);

        Ok(user)
    }
}
