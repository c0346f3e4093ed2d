// crates/backend-lib/src/middleware/classifier.rs

//! Attaches a refreshed token to classified failure responses.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::auth::{bearer_token, TokenUtils};
use crate::error::ClassifiedFailure;
use crate::metrics::TOKEN_REFRESHED;

/// Re-render every [`ClassifiedFailure`] with a renewed token when the
/// request carried a live one, so the caller can retry without logging in.
pub async fn refresh_token_on_failure(
    State(tokens): State<Arc<TokenUtils>>,
    request: Request,
    next: Next,
) -> Response {
    let presented = bearer_token(request.headers()).map(str::to_owned);

    let response = next.run(request).await;

    let failure = response.extensions().get::<ClassifiedFailure>().cloned();
    let (Some(ClassifiedFailure(envelope)), Some(presented)) = (failure, presented) else {
        return response;
    };

    match tokens.refresh_token(&presented) {
        Ok(refreshed) => {
            metrics::counter!(TOKEN_REFRESHED).increment(1);
            let status = response.status();
            let mut rebuilt =
                (status, Json(envelope.clone().token(Some(refreshed)))).into_response();
            rebuilt.extensions_mut().insert(ClassifiedFailure(envelope));
            rebuilt
        }
        Err(e) => {
            debug!("Not refreshing presented token: {e}");
            response
        }
    }
}
