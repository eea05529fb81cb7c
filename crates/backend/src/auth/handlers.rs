//! Authentication HTTP handlers.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

use super::{
    build_auth_cookie, clear_cookie, extract_cookie, jwt,
    middleware::build_cookie,
    types::{AuthUser, AuthUserResponse},
};

/// Lifetime of the CSRF state cookie set while the user is at Google.
const STATE_COOKIE_MAX_AGE: i64 = 10 * 60;

/// Start Google OAuth login flow.
///
/// Remembers a fresh CSRF state in a short-lived cookie and redirects the
/// browser to Google's consent page.
pub async fn auth_login(State(state): State<AppState>) -> Response {
    let config = &state.auth_config;

    let csrf_state = uuid::Uuid::new_v4().to_string();
    let auth_url = state.identity.authorization_url(&csrf_state);
    let cookie = build_cookie(
        &config.state_cookie_name,
        &csrf_state,
        STATE_COOKIE_MAX_AGE,
        config.secure_cookies,
    );

    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, auth_url.as_str()),
            (header::SET_COOKIE, cookie.as_str()),
        ],
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct AuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Handle Google OAuth callback.
///
/// Checks the CSRF state, exchanges the authorization code for the user's
/// profile, validates the email against the allowlist and sets the session
/// cookie on success.
pub async fn auth_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AuthCallbackParams>,
) -> Response {
    match handle_callback_inner(&state, &headers, params).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Auth callback error: {:?}", e);
            Redirect::to("/?auth_error=auth_failed").into_response()
        }
    }
}

async fn handle_callback_inner(
    state: &AppState,
    headers: &HeaderMap,
    params: AuthCallbackParams,
) -> Result<Response, ApiError> {
    let config = &state.auth_config;

    if let Some(error) = params.error {
        tracing::warn!("Google returned an OAuth error: {}", error);
        return Ok(Redirect::to("/?auth_error=access_denied").into_response());
    }

    let expected_state = extract_cookie(headers, &config.state_cookie_name);
    if expected_state.is_none() || expected_state != params.state {
        tracing::warn!("OAuth state mismatch, restarting login");
        return Ok(Redirect::to("/").into_response());
    }

    let code = params
        .code
        .ok_or_else(|| ApiError::bad_request("Missing code parameter"))?;

    let user_info = match state.identity.exchange_code(&code).await {
        Ok(user_info) => user_info,
        Err(e) => {
            tracing::error!("Token exchange failed: {:?}", e);
            return Ok(Redirect::to("/?auth_error=token_exchange_failed").into_response());
        }
    };

    tracing::info!("OAuth login attempt from: {}", user_info.email);

    // Check if email is allowed
    if !config.is_email_allowed(&user_info.email) {
        tracing::warn!("Unauthorized login attempt from: {}", user_info.email);
        return Ok(Redirect::to("/?auth_error=unauthorized_email").into_response());
    }

    let token = jwt::create_token(config, &user_info)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to create token: {}", e)))?;

    let session_cookie = build_auth_cookie(config, &token);
    let state_cookie = clear_cookie(config, &config.state_cookie_name);

    tracing::info!("Successful login for: {}", user_info.email);

    Ok((
        StatusCode::SEE_OTHER,
        [(header::LOCATION, "/dashboard")],
        AppendHeaders([
            (header::SET_COOKIE, session_cookie),
            (header::SET_COOKIE, state_cookie),
        ]),
    )
        .into_response())
}

/// Get current authenticated user info.
pub async fn auth_me(Extension(user): Extension<AuthUser>) -> Json<AuthUserResponse> {
    Json(user.into())
}

/// Logout - clear auth cookie.
pub async fn auth_logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_cookie(&state.auth_config, &state.auth_config.cookie_name);

    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, "/".to_string()), (header::SET_COOKIE, cookie)],
    )
}
