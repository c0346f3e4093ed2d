// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between `Vizboard` clients and the login server.
//! This module defines the JSON response envelope and the login payloads.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Numeric result codes carried in every [`ResultMap`]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(into = "u16", try_from = "u16")]
pub enum HttpCode {
    Success,
    Fail,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
}

impl HttpCode {
    /// Integer value written to the `code` field
    pub const fn code(self) -> u16 {
        match self {
            HttpCode::Success => 200,
            HttpCode::Fail => 400,
            HttpCode::Unauthorized => 401,
            HttpCode::Forbidden => 403,
            HttpCode::NotFound => 404,
            HttpCode::ServerError => 500,
        }
    }
}

impl From<HttpCode> for u16 {
    fn from(code: HttpCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for HttpCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            200 => Ok(HttpCode::Success),
            400 => Ok(HttpCode::Fail),
            401 => Ok(HttpCode::Unauthorized),
            403 => Ok(HttpCode::Forbidden),
            404 => Ok(HttpCode::NotFound),
            500 => Ok(HttpCode::ServerError),
            other => Err(format!("unknown result code {other}")),
        }
    }
}

/// Uniform response envelope used by every API response
///
/// Built fresh for each request through the chained constructors below:
/// ```
/// use vizboard_common::{HttpCode, ResultMap};
///
/// let map = ResultMap::fail().message("this user is not active");
/// assert_eq!(map.code, HttpCode::Fail);
/// assert!(map.token.is_none());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResultMap {
    /// Result code
    pub code: HttpCode,
    /// Human readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Arbitrary JSON payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    /// Issued or refreshed token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ResultMap {
    fn with_code(code: HttpCode) -> Self {
        Self {
            code,
            message: None,
            payload: None,
            token: None,
        }
    }

    /// Success envelope without a token
    pub fn ok() -> Self {
        Self::with_code(HttpCode::Success)
    }

    /// Success envelope carrying a freshly issued token
    pub fn success(token: impl Into<String>) -> Self {
        Self::ok().token(Some(token.into()))
    }

    /// Generic failure envelope
    pub fn fail() -> Self {
        Self::with_code(HttpCode::Fail)
    }

    /// Failure envelope with an explicit code
    pub fn fail_with_code(code: HttpCode) -> Self {
        Self::with_code(code)
    }

    /// Failure envelope that still hands a usable token to the caller
    pub fn fail_with_token(token: impl Into<String>) -> Self {
        Self::fail().token(Some(token.into()))
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Replace the token; `None` clears it
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn is_success(&self) -> bool {
        self.code == HttpCode::Success
    }
}

/// Credential login request
///
/// Fields are declared in the order their validation errors are reported.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "not_blank", message = "username cannot be EMPTY"))]
    #[serde(default)]
    pub username: String,

    #[validate(custom(function = "not_blank", message = "password cannot be EMPTY"))]
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    /// Field names in declaration order
    pub const FIELDS: [&'static str; 2] = ["username", "password"];
}

/// Rejects empty and whitespace-only values
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Payload returned after a successful login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub admin: bool,
    pub description: Option<String>,
    pub department: Option<String>,
    /// Mirrors the process-wide statistics toggle
    pub statistic_open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_omits_empty_fields() {
        let json = serde_json::to_value(ResultMap::fail().message("nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "code": 400, "message": "nope" }));
    }

    #[test]
    fn test_success_carries_token_and_payload() {
        let map = ResultMap::success("abc").payload(serde_json::json!([]));
        assert!(map.is_success());
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["code"], 200);
        assert_eq!(json["token"], "abc");
        assert_eq!(json["payload"], serde_json::json!([]));
    }

    #[test]
    fn test_code_parsing() {
        let map: ResultMap = serde_json::from_str(r#"{"code":404,"message":"gone"}"#).unwrap();
        assert_eq!(map.code, HttpCode::NotFound);
        assert!(serde_json::from_str::<ResultMap>(r#"{"code":418}"#).is_err());
    }

    #[test]
    fn test_blank_login_fields_fail_validation() {
        let request = LoginRequest {
            username: String::new(),
            password: "secret".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(!errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_whitespace_login_fields_fail_validation() {
        let request = LoginRequest {
            username: "alice".to_string(),
            password: " \t ".to_string(),
        };
        let errors = request.validate().unwrap_err();
        let password = &errors.field_errors()["password"][0];
        assert_eq!(password.message.as_deref(), Some("password cannot be EMPTY"));
        assert!(!errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_login_result_is_camel_case() {
        let result = LoginResult {
            statistic_open: true,
            ..LoginResult::default()
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["statisticOpen"], true);
    }
}
