//! Auth-related types and configuration.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

// Re-export shared types for convenience
pub use shared_types::AuthUserResponse;

const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:5000/callback";
const DEFAULT_CLIENT_SECRETS_FILE: &str = "client_secret.json";

/// Accepted range for `SESSION_DAYS`.
const SESSION_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=365;

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (Google account id)
    pub sub: String,
    pub email: String,
    /// User display name from Google
    pub name: Option<String>,
    /// Profile picture URL from Google
    pub picture: Option<String>,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Validated user from JWT
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub google_id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            google_id: claims.sub,
            email: claims.email,
            name: claims.name,
            picture: claims.picture,
        }
    }
}

impl From<AuthUser> for AuthUserResponse {
    fn from(user: AuthUser) -> Self {
        Self {
            google_id: user.google_id,
            email: user.email,
            name: user.name,
            picture: user.picture,
        }
    }
}

/// Auth configuration loaded from environment
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lowercased allowlist; empty admits every Google account.
    pub allowed_emails: Vec<String>,
    pub token_duration_days: i64,
    pub cookie_name: String,
    pub state_cookie_name: String,
    pub secure_cookies: bool,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub auth_redirect_uri: String,
}

/// Google's downloadable OAuth client file (`client_secret.json`).
#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    web: Option<ClientSecrets>,
    installed: Option<ClientSecrets>,
}

#[derive(Debug, Deserialize)]
struct ClientSecrets {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl ClientSecrets {
    fn parse(contents: &str) -> Result<Self> {
        let file: ClientSecretsFile =
            serde_json::from_str(contents).context("client secrets file is not valid JSON")?;
        match file.web.or(file.installed) {
            Some(secrets) => Ok(secrets),
            None => bail!("client secrets file has neither a \"web\" nor an \"installed\" entry"),
        }
    }
}

impl AuthConfig {
    /// Load auth configuration from environment variables.
    ///
    /// Required env vars:
    /// - `JWT_SECRET`: Secret key for signing session tokens
    /// - `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET`: Google OAuth client, unless
    ///   `GOOGLE_CLIENT_SECRETS_FILE` (default `client_secret.json`) provides them
    ///
    /// Optional env vars:
    /// - `AUTH_REDIRECT_URI`: OAuth callback URI
    /// - `ALLOWED_EMAILS`: Comma-separated list of allowed email addresses
    /// - `SESSION_DAYS`: Session lifetime in days
    /// - `RUST_ENV`: `production` marks cookies `Secure`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            bail!("JWT_SECRET cannot be empty");
        }

        let allowed_emails: Vec<String> = lookup("ALLOWED_EMAILS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let token_duration_days: i64 = match lookup("SESSION_DAYS") {
            Some(days) => days
                .parse()
                .context("SESSION_DAYS must be a whole number of days")?,
            None => 7,
        };
        if !SESSION_DAYS_RANGE.contains(&token_duration_days) {
            bail!(
                "SESSION_DAYS must be between {} and {}, got {}",
                SESSION_DAYS_RANGE.start(),
                SESSION_DAYS_RANGE.end(),
                token_duration_days
            );
        }

        let (google_client_id, google_client_secret, file_redirect) =
            match (lookup("GOOGLE_CLIENT_ID"), lookup("GOOGLE_CLIENT_SECRET")) {
                (Some(id), Some(secret)) => (id, secret, None),
                _ => {
                    let path = lookup("GOOGLE_CLIENT_SECRETS_FILE")
                        .unwrap_or_else(|| DEFAULT_CLIENT_SECRETS_FILE.to_string());
                    let secrets = load_client_secrets(Path::new(&path)).with_context(|| {
                        format!(
                            "GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET must be set, or {} must exist",
                            path
                        )
                    })?;
                    let redirect = secrets.redirect_uris.into_iter().next();
                    (secrets.client_id, secrets.client_secret, redirect)
                }
            };

        let auth_redirect_uri = lookup("AUTH_REDIRECT_URI")
            .or(file_redirect)
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

        Ok(Self {
            jwt_secret,
            allowed_emails,
            token_duration_days,
            cookie_name: "auth_token".to_string(),
            state_cookie_name: "oauth_state".to_string(),
            secure_cookies: lookup("RUST_ENV").as_deref() == Some("production"),
            google_client_id,
            google_client_secret,
            auth_redirect_uri,
        })
    }

    /// Check if an email address is in the allowed list.
    pub fn is_email_allowed(&self, email: &str) -> bool {
        self.allowed_emails.is_empty() || self.allowed_emails.contains(&email.to_lowercase())
    }
}

fn load_client_secrets(path: &Path) -> Result<ClientSecrets> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    ClientSecrets::parse(&contents)
}

#[cfg(test)]
pub(crate) fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-key-for-testing-only".to_string(),
        allowed_emails: vec!["test@example.com".to_string()],
        token_duration_days: 7,
        cookie_name: "auth_token".to_string(),
        state_cookie_name: "oauth_state".to_string(),
        secure_cookies: false,
        google_client_id: "test".to_string(),
        google_client_secret: "test".to_string(),
        auth_redirect_uri: "http://localhost/callback".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_with_env_credentials() {
        let config = AuthConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("GOOGLE_CLIENT_ID", "id"),
            ("GOOGLE_CLIENT_SECRET", "secret"),
            ("ALLOWED_EMAILS", " A@Example.com, ,b@example.com "),
        ]))
        .expect("config should load");

        assert_eq!(config.google_client_id, "id");
        assert_eq!(config.auth_redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(config.allowed_emails, ["a@example.com", "b@example.com"]);
        assert_eq!(config.token_duration_days, 7);
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_missing_jwt_secret() {
        let result = AuthConfig::from_lookup(lookup_from(&[
            ("GOOGLE_CLIENT_ID", "id"),
            ("GOOGLE_CLIENT_SECRET", "secret"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_credentials_and_file() {
        let result = AuthConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("GOOGLE_CLIENT_SECRETS_FILE", "/nonexistent/client_secret.json"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_production_sets_secure_cookies() {
        let config = AuthConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("GOOGLE_CLIENT_ID", "id"),
            ("GOOGLE_CLIENT_SECRET", "secret"),
            ("RUST_ENV", "production"),
            ("SESSION_DAYS", "1"),
        ]))
        .unwrap();
        assert!(config.secure_cookies);
        assert_eq!(config.token_duration_days, 1);
    }

    #[test]
    fn test_session_days_out_of_range() {
        for days in ["0", "-3", "9223372036854775807", "366"] {
            let result = AuthConfig::from_lookup(lookup_from(&[
                ("JWT_SECRET", "s3cret"),
                ("GOOGLE_CLIENT_ID", "id"),
                ("GOOGLE_CLIENT_SECRET", "secret"),
                ("SESSION_DAYS", days),
            ]));
            assert!(result.is_err(), "SESSION_DAYS={} should be rejected", days);
        }

        let config = AuthConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("GOOGLE_CLIENT_ID", "id"),
            ("GOOGLE_CLIENT_SECRET", "secret"),
            ("SESSION_DAYS", "365"),
        ]))
        .unwrap();
        assert_eq!(config.token_duration_days, 365);
    }

    #[test]
    fn test_parse_web_client_secrets() {
        let secrets = ClientSecrets::parse(
            r#"{"web":{"client_id":"abc.apps.googleusercontent.com","client_secret":"xyz",
               "redirect_uris":["http://127.0.0.1:5000/callback"]}}"#,
        )
        .unwrap();
        assert_eq!(secrets.client_id, "abc.apps.googleusercontent.com");
        assert_eq!(secrets.client_secret, "xyz");
        assert_eq!(secrets.redirect_uris, ["http://127.0.0.1:5000/callback"]);
    }

    #[test]
    fn test_parse_client_secrets_without_entry() {
        assert!(ClientSecrets::parse(r#"{"other":{}}"#).is_err());
    }

    #[test]
    fn test_email_allowlist() {
        let mut config = test_config();
        assert!(config.is_email_allowed("Test@Example.com"));
        assert!(!config.is_email_allowed("other@example.com"));

        config.allowed_emails.clear();
        assert!(config.is_email_allowed("other@example.com"));
    }
}
