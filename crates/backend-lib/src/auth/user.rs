// ============================
// crates/backend-lib/src/auth/user.rs
// ============================
//! Accounts and authenticated principals.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use vizboard_common::LoginResult;

use super::TokenEntity;

/// Account record held by the user store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// scrypt PHC string
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// New inactive account
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            password: password_hash.into(),
            name: None,
            avatar: None,
            admin: false,
            active: false,
            description: None,
            department: None,
            created_at: Utc::now(),
        }
    }

    pub fn token_entity(&self) -> TokenEntity {
        TokenEntity::new(self.username.clone(), self.password.clone())
    }

    pub fn to_login_result(&self, statistic_open: bool) -> LoginResult {
        LoginResult {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            avatar: self.avatar.clone(),
            admin: self.admin,
            description: self.description.clone(),
            department: self.department.clone(),
            statistic_open,
        }
    }
}

/// Identity established by an external OAuth2 provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuth2Identity {
    /// Provider the identity came from, e.g. `github`
    pub registration_id: String,
    /// Principal name reported by the provider
    pub name: String,
    /// Raw user attributes reported by the provider
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl OAuth2Identity {
    pub fn new(registration_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            registration_id: registration_id.into(),
            name: name.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Non-empty string attribute
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Authenticated caller, placed in request extensions by the OAuth2
/// integration that completes the provider callback.
///
/// Requests without one are anonymous; `externalLogin` answers them with 401.
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    /// Federated login completed through an OAuth2 provider
    OAuth2(OAuth2Identity),
}
