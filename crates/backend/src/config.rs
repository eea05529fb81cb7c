use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use chrono::FixedOffset;

use crate::auth::types::AuthConfig;

/// India Standard Time, in minutes east of UTC.
const IST_OFFSET_MINUTES: i32 = 5 * 60 + 30;

#[derive(Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Timezone the dashboard clock is shown in.
    pub display_offset: FixedOffset,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse()
            .context("HOST must be an IP address")?;
        let port = lookup("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let offset_minutes: i32 = match lookup("DISPLAY_UTC_OFFSET_MINUTES") {
            Some(minutes) => minutes
                .parse()
                .context("DISPLAY_UTC_OFFSET_MINUTES must be a whole number of minutes")?,
            None => IST_OFFSET_MINUTES,
        };
        let display_offset = FixedOffset::east_opt(offset_minutes * 60)
            .context("DISPLAY_UTC_OFFSET_MINUTES is out of range")?;

        Ok(Self {
            host,
            port,
            display_offset,
            auth: AuthConfig::from_lookup(&lookup)?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
