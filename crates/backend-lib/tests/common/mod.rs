//! Test utilities for the login server tests
//!
//! Provides a scripted `UserService` and helpers for driving the router
//! in-process with `tower::ServiceExt::oneshot`.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use backend_lib::{
    auth::{OAuth2Identity, Principal, TokenUtils, User, UserService},
    config::{OAuth2Settings, Settings},
    create_router,
    error::AppError,
    oauth2::ClientRegistration,
    AppState,
};
use dashmap::DashMap;
use std::sync::Arc;
use tower::ServiceExt;
use vizboard_common::{LoginRequest, ResultMap};

pub const SECRET: &str = "integration-test-secret";

type Failure = Box<dyn Fn() -> AppError + Send + Sync>;

/// In-memory user service with plain-text passwords and optional scripted failures
#[derive(Default)]
pub struct StubUserService {
    users: DashMap<String, (User, String)>,
    failure: Option<Failure>,
    pub activations: DashMap<String, usize>,
}

impl StubUserService {
    pub fn with_user(self, username: &str, password: &str, active: bool) -> Self {
        let mut user = User::new(username, format!("{username}@example.com"), format!("hash-of-{password}"));
        user.active = active;
        self.users
            .insert(username.to_string(), (user, password.to_string()));
        self
    }

    /// Make every call fail with the error built by `f`
    pub fn failing_with(mut self, f: impl Fn() -> AppError + Send + Sync + 'static) -> Self {
        self.failure = Some(Box::new(f));
        self
    }

    fn check_failure(&self) -> Result<(), AppError> {
        match &self.failure {
            Some(f) => Err(f()),
            None => Ok(()),
        }
    }

    pub fn user(&self, username: &str) -> Option<User> {
        self.users.get(username).map(|entry| entry.0.clone())
    }
}

#[async_trait]
impl UserService for StubUserService {
    async fn user_login(&self, request: &LoginRequest) -> Result<User, AppError> {
        self.check_failure()?;
        let entry = self
            .users
            .get(&request.username)
            .ok_or_else(|| AppError::NotFound("user is not found".to_string()))?;
        if entry.1 != request.password {
            return Err(AppError::Server("username or password is wrong".to_string()));
        }
        Ok(entry.0.clone())
    }

    async fn external_register(&self, identity: &OAuth2Identity) -> Result<User, AppError> {
        self.check_failure()?;
        if let Some(user) = self.user(&identity.name) {
            return Ok(user);
        }
        let email = identity.attribute("email").unwrap_or(&identity.name).to_string();
        let user = User::new(identity.name.clone(), email, "federated-hash");
        self.users
            .insert(identity.name.clone(), (user.clone(), String::new()));
        Ok(user)
    }

    async fn activate_user_no_login(&self, token: &str) -> Result<User, AppError> {
        self.check_failure()?;
        let username = TokenUtils::new(SECRET, 60_000).username(token)?;
        let mut entry = self
            .users
            .get_mut(&username)
            .ok_or_else(|| AppError::NotFound("user is not found".to_string()))?;
        entry.0.active = true;
        *self.activations.entry(username).or_insert(0) += 1;
        Ok(entry.0.clone())
    }
}

pub fn settings(statistic: bool, clients: Option<Vec<(&str, &str)>>) -> Settings {
    let mut settings = Settings::default();
    settings.jwt_token.secret = SECRET.to_string();
    settings.statistic.enable = statistic;
    settings.oauth2 = clients.map(|clients| OAuth2Settings {
        clients: clients
            .into_iter()
            .map(|(id, name)| ClientRegistration {
                registration_id: id.to_string(),
                client_name: name.to_string(),
            })
            .collect(),
        ..OAuth2Settings::default()
    });
    settings
}

pub fn tokens() -> Arc<TokenUtils> {
    Arc::new(TokenUtils::new(SECRET, 60_000))
}

pub fn app(users: Arc<StubUserService>, settings: Settings) -> Router {
    let state = AppState::new(users, tokens(), settings);
    create_router(Arc::new(state))
}

pub fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn with_bearer(mut request: Request<Body>, token: &str) -> Request<Body> {
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    request
}

pub fn with_principal(mut request: Request<Body>, principal: Principal) -> Request<Body> {
    request.extensions_mut().insert(principal);
    request
}

/// Send a request and return the status plus the raw body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

/// Send a request and decode the envelope
pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, ResultMap) {
    let (status, body) = send(app, request).await;
    let envelope = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("body is not an envelope ({e}): {}", String::from_utf8_lossy(&body)));
    (status, envelope)
}
