// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
//!
//! Handlers never catch their failures; they return `AppError` and this module
//! is the single place mapping each variant to an HTTP status, a result code,
//! a client-visible message and a log treatment. Refreshing the caller's token
//! is left to [`crate::middleware::classifier`], which sees the request headers.
use std::error::Error as _;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;
use vizboard_common::{HttpCode, ResultMap};

use crate::auth::TokenError;

/// Message sent to clients for failures that are not classified
pub const GENERIC_FAILURE_MESSAGE: &str = "Internal Server Error";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Domain failure whose message is safe to show
    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Malformed or missing request fields
    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

/// How much of a failure ends up in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDetail {
    /// Display text only
    MessageOnly,
    /// Debug form plus the source chain
    Full,
}

/// Envelope of a classified failure, stored in the response extensions so
/// the classifier middleware can re-render it with a refreshed token.
#[derive(Debug, Clone)]
pub struct ClassifiedFailure(pub ResultMap);

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the envelope result code for this error
    pub fn result_code(&self) -> HttpCode {
        match self {
            AppError::Forbidden(_) => HttpCode::Forbidden,
            AppError::Unauthorized(_) => HttpCode::Unauthorized,
            AppError::NotFound(_) => HttpCode::NotFound,
            _ => HttpCode::Fail,
        }
    }

    /// Whether the variant is one of the named failure kinds
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            AppError::Server(_)
                | AppError::Forbidden(_)
                | AppError::Unauthorized(_)
                | AppError::NotFound(_)
                | AppError::Validation(_)
        )
    }

    /// Message shown to the client; unclassified failures never leak details
    pub fn client_message(&self) -> String {
        if self.is_classified() {
            self.to_string()
        } else {
            GENERIC_FAILURE_MESSAGE.to_string()
        }
    }

    pub fn log_detail(&self) -> LogDetail {
        match self {
            AppError::Forbidden(_) => LogDetail::MessageOnly,
            _ => LogDetail::Full,
        }
    }

    /// Status and envelope for this failure, without a token
    pub fn classify(&self) -> (StatusCode, ResultMap) {
        let envelope = ResultMap::fail_with_code(self.result_code()).message(self.client_message());
        (self.status_code(), envelope)
    }

    /// Write this failure to the log according to [`AppError::log_detail`]
    pub fn log(&self) {
        match self.log_detail() {
            LogDetail::MessageOnly => error!("{self}"),
            LogDetail::Full => {
                let mut chain = String::new();
                let mut source = self.source();
                while let Some(cause) = source {
                    chain.push_str(": ");
                    chain.push_str(&cause.to_string());
                    source = cause.source();
                }
                error!(error = ?self, "{self}{chain}");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let code = self.result_code().code().to_string();
        metrics::counter!(crate::metrics::REQUEST_FAILED, "code" => code).increment(1);

        let (status, envelope) = self.classify();
        let mut response = (status, Json(envelope.clone())).into_response();
        response.extensions_mut().insert(ClassifiedFailure(envelope));
        response
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
