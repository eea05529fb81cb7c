//! Google OAuth2 / OpenID Connect client.
//!
//! Only the authorization-code flow is used: build the consent URL, then
//! trade the returned code for an access token and read the OpenID userinfo.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::types::AuthConfig;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

const SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/userinfo.email",
    "openid",
];

/// Profile of a signed-in Google account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Source of user identities for the login flow.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is sent to for consent, carrying `state`.
    fn authorization_url(&self, state: &str) -> String;

    /// Trade an authorization code for the user's profile.
    async fn exchange_code(&self, code: &str) -> Result<GoogleUserInfo>;
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

#[derive(serde::Serialize)]
struct TokenRequest<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'a str,
}

pub struct GoogleProvider {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GoogleProvider {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.auth_redirect_uri.clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}&\
             state={}",
            AUTH_ENDPOINT,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&SCOPES.join(" ")),
            urlencoding::encode(state)
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<GoogleUserInfo> {
        let token_response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&TokenRequest {
                code,
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                redirect_uri: &self.redirect_uri,
                grant_type: "authorization_code",
            })
            .send()
            .await
            .context("Token exchange failed")?;

        if !token_response.status().is_success() {
            let status = token_response.status();
            let body = token_response.text().await.unwrap_or_default();
            return Err(anyhow!("Token exchange failed: {} - {}", status, body));
        }

        let tokens: GoogleTokenResponse = token_response
            .json()
            .await
            .context("Invalid token response")?;

        let user_info = self
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .context("Failed to get user info")?
            .error_for_status()
            .context("Userinfo request rejected")?
            .json()
            .await
            .context("Invalid user info response")?;

        Ok(user_info)
    }
}

#[cfg(test)]
pub(crate) fn test_user() -> GoogleUserInfo {
    GoogleUserInfo {
        sub: "1234567890".to_string(),
        email: "test@example.com".to_string(),
        name: Some("Test User".to_string()),
        picture: Some("https://example.com/me.png".to_string()),
    }
}

/// Provider that accepts a single code and hands back a fixed user.
#[cfg(test)]
pub(crate) struct FakeProvider {
    pub code: String,
    pub user: GoogleUserInfo,
}

#[cfg(test)]
#[async_trait]
impl IdentityProvider for FakeProvider {
    fn authorization_url(&self, state: &str) -> String {
        format!("https://accounts.example.com/auth?state={}", state)
    }

    async fn exchange_code(&self, code: &str) -> Result<GoogleUserInfo> {
        if code == self.code {
            Ok(self.user.clone())
        } else {
            Err(anyhow!("unknown authorization code"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::test_config;

    #[test]
    fn test_authorization_url() {
        let provider = GoogleProvider::new(&test_config());
        let url = provider.authorization_url("abc-123");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=test&"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%2Fcallback&"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("openid"));
        assert!(url.contains("userinfo.email"));
        assert!(url.ends_with("state=abc-123"));
    }

    #[test]
    fn test_userinfo_deserializes_without_optional_fields() {
        let info: GoogleUserInfo =
            serde_json::from_str(r#"{"sub":"42","email":"a@b.c","email_verified":true}"#).unwrap();
        assert_eq!(info.sub, "42");
        assert_eq!(info.name, None);
        assert_eq!(info.picture, None);
    }
}
