use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;
use tripplan_core::error::{Result, TripPlanError};
use tripplan_core::origin::{AllowedOrigins, OriginFilter};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub cors: CorsSection,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.cors.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// IP literal to bind on.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(1000..=120000).contains(&self.shutdown_grace_ms) {
            return Err(TripPlanError::Config(
                "server.shutdown_grace_ms must be between 1000 and 120000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            TripPlanError::Config(format!("server.host must be an IP address: {}", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsSection {
    /// Comma-delimited origin list. Never fails to parse; see [`AllowedOrigins::parse`].
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,

    #[serde(default = "default_allow_credentials")]
    pub allow_credentials: bool,

    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

impl Default for CorsSection {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allow_credentials: default_allow_credentials(),
            max_age_secs: default_max_age_secs(),
        }
    }
}

impl CorsSection {
    pub fn validate(&self) -> Result<()> {
        if self.max_age_secs > 86400 {
            return Err(TripPlanError::Config(
                "cors.max_age_secs must not exceed 86400".into(),
            ));
        }
        Ok(())
    }

    pub fn origin_filter(&self) -> OriginFilter {
        OriginFilter::new(AllowedOrigins::parse(&self.allowed_origins))
            .with_credentials(self.allow_credentials)
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}
fn default_shutdown_grace_ms() -> u64 {
    10000
}
fn default_allowed_origins() -> String {
    "http://localhost:5173".into()
}
fn default_allow_credentials() -> bool {
    true
}
fn default_max_age_secs() -> u64 {
    600
}
