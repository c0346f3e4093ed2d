use super::*;
use crate::auth::{TokenEntity, TokenUtils};
use crate::error::AppError;
use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceExt;
use vizboard_common::{HttpCode, ResultMap};

async fn forbidden_handler() -> Result<Json<ResultMap>, AppError> {
    Err(AppError::Forbidden("no permission".to_string()))
}

async fn ok_handler() -> Json<ResultMap> {
    Json(ResultMap::ok())
}

async fn bare_unauthorized_handler() -> impl IntoResponse {
    StatusCode::UNAUTHORIZED
}

fn app(tokens: Arc<TokenUtils>) -> Router {
    Router::new()
        .route("/forbidden", get(forbidden_handler))
        .route("/ok", get(ok_handler))
        .route("/bare", get(bare_unauthorized_handler))
        .layer(axum::middleware::from_fn_with_state(
            tokens,
            refresh_token_on_failure,
        ))
}

fn tokens() -> Arc<TokenUtils> {
    Arc::new(TokenUtils::new("middleware-test-secret", 60_000))
}

async fn call(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().uri(uri);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_failure_gets_refreshed_token() {
    let tokens = tokens();
    let entity = TokenEntity::new("alice", "hash");
    let presented = tokens.generate_token(&entity).unwrap();

    let (status, body) = call(app(tokens.clone()), "/forbidden", Some(&presented)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let envelope: ResultMap = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope.code, HttpCode::Forbidden);
    assert_eq!(envelope.message.as_deref(), Some("no permission"));

    let refreshed = envelope.token.expect("refreshed token");
    assert_ne!(refreshed, presented);
    assert!(tokens.validate_token(&refreshed, &entity));
}

#[tokio::test]
async fn test_failure_without_token_has_none() {
    let (status, body) = call(app(tokens()), "/forbidden", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let envelope: ResultMap = serde_json::from_slice(&body).unwrap();
    assert!(envelope.token.is_none());
}

#[tokio::test]
async fn test_foreign_or_garbage_token_is_not_refreshed() {
    let foreign = TokenUtils::new("someone-else", 60_000)
        .generate_token(&TokenEntity::new("alice", "hash"))
        .unwrap();

    for presented in [foreign.as_str(), "not-a-token"] {
        let (_, body) = call(app(tokens()), "/forbidden", Some(presented)).await;
        let envelope: ResultMap = serde_json::from_slice(&body).unwrap();
        assert!(envelope.token.is_none());
        assert_eq!(envelope.message.as_deref(), Some("no permission"));
    }
}

#[tokio::test]
async fn test_success_and_bare_responses_untouched() {
    let tokens = tokens();
    let presented = tokens
        .generate_token(&TokenEntity::new("alice", "hash"))
        .unwrap();

    let (status, body) = call(app(tokens.clone()), "/ok", Some(&presented)).await;
    assert_eq!(status, StatusCode::OK);
    let envelope: ResultMap = serde_json::from_slice(&body).unwrap();
    assert!(envelope.token.is_none());

    let (status, body) = call(app(tokens), "/bare", Some(&presented)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_empty());
}
