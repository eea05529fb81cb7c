//! Session token creation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use super::google::GoogleUserInfo;
use super::types::{AuthConfig, Claims};

/// Create a new session token for a signed-in Google user.
pub fn create_token(
    config: &AuthConfig,
    user: &GoogleUserInfo,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::days(config.token_duration_days);

    let claims = Claims {
        sub: user.sub.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        picture: user.picture.clone(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    sign(config, &claims)
}

/// Re-issue a token for existing claims with a fresh lifetime.
pub fn refresh_token(
    config: &AuthConfig,
    claims: &Claims,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let refreshed = Claims {
        iat: now.timestamp(),
        exp: (now + Duration::days(config.token_duration_days)).timestamp(),
        ..claims.clone()
    };
    sign(config, &refreshed)
}

fn sign(config: &AuthConfig, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

/// Validate a session token and return claims.
pub fn validate_token(
    config: &AuthConfig,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Check if token should be refreshed (older than 1 day).
pub fn should_refresh(claims: &Claims) -> bool {
    let now = Utc::now().timestamp();
    let age_seconds = now - claims.iat;
    let one_day_seconds = 86400;
    age_seconds > one_day_seconds
}
