//! Authentication middleware layer for protecting routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};

use crate::error::ErrorResponse;
use crate::AppState;

use super::jwt;
use super::types::{AuthConfig, AuthUser, Claims};

/// Why a request could not be tied to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    Missing,
    Invalid,
    NotAllowed,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AuthRejection::Missing => (StatusCode::UNAUTHORIZED, "Missing authentication"),
            AuthRejection::Invalid => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthRejection::NotAllowed => (StatusCode::FORBIDDEN, "Email not authorized"),
        };
        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                details: None,
            }),
        )
            .into_response()
    }
}

/// Middleware for JSON API routes.
///
/// Rejects with a JSON error body. On success the [`AuthUser`] is available
/// to handlers as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &state.auth_config) {
        Ok(claims) => run_authenticated(&state.auth_config, claims, request, next).await,
        Err(rejection) => rejection.into_response(),
    }
}

/// Middleware for HTML pages.
///
/// Like [`require_auth`], but anonymous visitors are sent back to the login page.
pub async fn require_session(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &state.auth_config) {
        Ok(claims) => run_authenticated(&state.auth_config, claims, request, next).await,
        Err(rejection) => {
            tracing::debug!("Session check failed: {:?}", rejection);
            Redirect::to("/").into_response()
        }
    }
}

async fn run_authenticated(
    config: &AuthConfig,
    claims: Claims,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request
        .extensions_mut()
        .insert(AuthUser::from(claims.clone()));
    let response = next.run(request).await;

    if !jwt::should_refresh(&claims) {
        return response;
    }

    match jwt::refresh_token(config, &claims) {
        Ok(new_token) => {
            let cookie = build_auth_cookie(config, &new_token);
            let (mut parts, body) = response.into_parts();
            if let Ok(cookie_value) = cookie.parse() {
                parts.headers.append(header::SET_COOKIE, cookie_value);
            }
            Response::from_parts(parts, body)
        }
        Err(e) => {
            tracing::warn!("Failed to refresh session token: {:?}", e);
            response
        }
    }
}

/// Validate the session carried by a request.
///
/// The token is read from the session cookie first, then from an
/// `Authorization: Bearer` header.
pub fn authenticate(headers: &HeaderMap, config: &AuthConfig) -> Result<Claims, AuthRejection> {
    let token = extract_token_from_cookie(headers, &config.cookie_name)
        .or_else(|| extract_token_from_header(headers))
        .ok_or(AuthRejection::Missing)?;

    let claims = jwt::validate_token(config, &token).map_err(|_| AuthRejection::Invalid)?;

    // Verify email is still allowed
    if !config.is_email_allowed(&claims.email) {
        return Err(AuthRejection::NotAllowed);
    }

    Ok(claims)
}

/// Extract and validate user from request headers.
///
/// Returns the authenticated user if the token is valid and email is allowed.
pub fn extract_auth_user(
    headers: &HeaderMap,
    config: &AuthConfig,
) -> Result<AuthUser, AuthRejection> {
    authenticate(headers, config).map(AuthUser::from)
}

/// Read a cookie value by name.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(cookie_header) = value.to_str() else {
            continue;
        };
        for cookie_str in cookie_header.split(';') {
            if let Ok(cookie) = cookie::Cookie::parse(cookie_str.trim()) {
                if cookie.name() == name {
                    return Some(cookie.value().to_string());
                }
            }
        }
    }

    None
}

fn extract_token_from_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    extract_cookie(headers, cookie_name).filter(|v| !v.is_empty())
}

fn extract_token_from_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Build a `Set-Cookie` value.
pub fn build_cookie(name: &str, value: &str, max_age_seconds: i64, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        name, value, max_age_seconds, secure
    )
}

/// Build the session cookie for a token.
pub fn build_auth_cookie(config: &AuthConfig, token: &str) -> String {
    let max_age = config.token_duration_days * 24 * 60 * 60;
    build_cookie(&config.cookie_name, token, max_age, config.secure_cookies)
}

/// Build a cookie that tells the browser to drop `name`.
pub fn clear_cookie(config: &AuthConfig, name: &str) -> String {
    build_cookie(name, "", 0, config.secure_cookies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::google::test_user;
    use crate::auth::types::test_config;
    use axum::http::HeaderValue;

    fn headers_with(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_build_auth_cookie() {
        let mut config = test_config();
        assert_eq!(
            build_auth_cookie(&config, "tok"),
            "auth_token=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=604800"
        );

        config.secure_cookies = true;
        assert!(build_auth_cookie(&config, "tok").ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie() {
        let config = test_config();
        assert_eq!(
            clear_cookie(&config, "oauth_state"),
            "oauth_state=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
        );
    }

    #[test]
    fn test_extract_cookie_among_others() {
        let headers = headers_with(header::COOKIE, "theme=dark; oauth_state=xyz; other=1");
        assert_eq!(extract_cookie(&headers, "oauth_state"), Some("xyz".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_authenticate_from_cookie() {
        let config = test_config();
        let token = jwt::create_token(&config, &test_user()).unwrap();
        let headers = headers_with(header::COOKIE, &format!("auth_token={}", token));

        let user = extract_auth_user(&headers, &config).expect("should authenticate");
        assert_eq!(user.google_id, "1234567890");
        assert_eq!(user.email, "test@example.com");
    }

    #[test]
    fn test_authenticate_from_bearer_header() {
        let config = test_config();
        let token = jwt::create_token(&config, &test_user()).unwrap();
        let headers = headers_with(header::AUTHORIZATION, &format!("Bearer {}", token));

        assert!(authenticate(&headers, &config).is_ok());
    }

    #[test]
    fn test_authenticate_rejections() {
        let config = test_config();
        assert_eq!(
            authenticate(&HeaderMap::new(), &config).unwrap_err(),
            AuthRejection::Missing
        );

        let headers = headers_with(header::COOKIE, "auth_token=garbage");
        assert_eq!(
            authenticate(&headers, &config).unwrap_err(),
            AuthRejection::Invalid
        );

        let mut outsider = test_user();
        outsider.email = "outsider@example.com".to_string();
        let token = jwt::create_token(&config, &outsider).unwrap();
        let headers = headers_with(header::COOKIE, &format!("auth_token={}", token));
        assert_eq!(
            authenticate(&headers, &config).unwrap_err(),
            AuthRejection::NotAllowed
        );
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            AuthRejection::Missing.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::NotAllowed.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
