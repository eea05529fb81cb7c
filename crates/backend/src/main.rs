use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
pub mod error;
mod handlers;
mod routes;
mod services;
mod templates;

use crate::auth::{types::AuthConfig, GoogleProvider, IdentityProvider};
use crate::config::AppConfig;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_config: AuthConfig,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let identity = Arc::new(GoogleProvider::new(&config.auth));
        Self {
            auth_config: config.auth.clone(),
            config: Arc::new(config),
            identity,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pattern_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    tracing::info!("Starting pattern dashboard");
    if config.auth.allowed_emails.is_empty() {
        tracing::warn!("ALLOWED_EMAILS not set, any Google account can sign in");
    }

    let addr = config.socket_addr();
    let app = routes::app_router(AppState::new(config));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
