// ============================
// crates/backend-lib/src/handlers/login.rs
// ============================
//! Login HTTP handlers.
//!
//! - `POST {base}/login` credential login
//! - `GET {base}/login/getOauth2Clients` configured identity providers
//! - `POST {base}/login/externalLogin` login with a federated identity
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;
use tracing::{debug, info};
use vizboard_common::{LoginRequest, ResultMap};

use crate::auth::Principal;
use crate::error::AppError;
use crate::metrics::{LOGIN_EXTERNAL, LOGIN_INACTIVE, LOGIN_INVALID, LOGIN_SUCCESS};
use crate::validation::validate_login;
use crate::AppState;

const INACTIVE_USER_MESSAGE: &str = "this user is not active";

/// Render an envelope with the HTTP status matching its code
fn envelope(map: ResultMap) -> Response {
    let status = StatusCode::from_u16(map.code.code()).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(map)).into_response()
}

/// Log in with username (or email) and password.
///
/// A token is generated for every account that authenticates, active or not;
/// inactive accounts receive it inside a failure envelope so they can go on to
/// activate without logging in again.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    if let Err(message) = validate_login(&request) {
        counter!(LOGIN_INVALID).increment(1);
        return Ok(envelope(ResultMap::fail().message(message)));
    }

    let user = state.users.user_login(&request).await?;
    let token = state.tokens.generate_token(&user.token_entity())?;

    if !user.active {
        info!("This user is not active: {}", request.username);
        counter!(LOGIN_INACTIVE).increment(1);
        return Ok(envelope(
            ResultMap::fail_with_token(token).message(INACTIVE_USER_MESSAGE),
        ));
    }

    let result = user.to_login_result(state.settings.statistic.enable);
    debug!("User {} logged in", user.username);
    counter!(LOGIN_SUCCESS).increment(1);

    Ok(envelope(
        ResultMap::success(token).payload(serde_json::to_value(result)?),
    ))
}

/// List configured identity providers with their authorization URLs
pub async fn get_oauth2_clients(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ResultMap>, AppError> {
    let clients = match &state.registry {
        Some(registry) => registry.authorization_links(),
        None => Vec::new(),
    };

    Ok(Json(ResultMap::ok().payload(serde_json::to_value(clients)?)))
}

/// Log in with an identity established by an external OAuth2 provider.
///
/// Responds `401` with an empty body unless the request carries an OAuth2
/// principal.
pub async fn external_login(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let Some(Principal::OAuth2(identity)) = request.extensions().get::<Principal>().cloned() else {
        return Ok(StatusCode::UNAUTHORIZED.into_response());
    };

    let user = state.users.external_register(&identity).await?;
    let token = state.tokens.generate_token(&user.token_entity())?;
    state.users.activate_user_no_login(&token).await?;

    let result = user.to_login_result(state.settings.statistic.enable);
    info!(
        "User {} logged in through {}",
        user.username, identity.registration_id
    );
    counter!(LOGIN_EXTERNAL, "provider" => identity.registration_id.clone()).increment(1);

    Ok(envelope(
        ResultMap::success(token).payload(serde_json::to_value(result)?),
    ))
}
