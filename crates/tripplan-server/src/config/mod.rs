//! Server config loader.
//!
//! Layering: built-in defaults, then an optional strict YAML file named by
//! `TRIPPLAN_CONFIG`, then `HOST` / `PORT` / `ALLOWED_ORIGINS` from the
//! environment. The result is validated once and never changes afterwards.

pub mod schema;

use std::fs;

use tripplan_core::error::{Result, TripPlanError};

pub use schema::{AppConfig, CorsSection, ServerSection};

pub const CONFIG_PATH_ENV: &str = "TRIPPLAN_CONFIG";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";

pub fn load_from_env() -> Result<AppConfig> {
    load_with(|key| std::env::var(key).ok())
}

/// Same as [`load_from_env`] with an injectable variable lookup.
pub fn load_with<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match lookup(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        Some(path) => parse_file(&path)?,
        None => AppConfig::default(),
    };
    apply_env(&mut cfg, &lookup)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let cfg = parse_file(path)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg = parse_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TripPlanError::Config(format!("read {path} failed: {e}")))?;
    parse_str(&s)
}

fn parse_str(s: &str) -> Result<AppConfig> {
    serde_yaml::from_str(s).map_err(|e| TripPlanError::Config(format!("invalid yaml: {e}")))
}

fn apply_env<F>(cfg: &mut AppConfig, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    // Empty HOST/PORT count as unset.
    if let Some(host) = lookup(HOST_ENV).filter(|v| !v.is_empty()) {
        cfg.server.host = host;
    }
    if let Some(port) = lookup(PORT_ENV).filter(|v| !v.is_empty()) {
        cfg.server.port = port.trim().parse().map_err(|_| {
            TripPlanError::Config(format!("{PORT_ENV} must be a port number, got {port:?}"))
        })?;
    }
    // An empty origin list is meaningful: it denies every cross-origin request.
    if let Some(origins) = lookup(ALLOWED_ORIGINS_ENV) {
        cfg.cors.allowed_origins = origins;
    }
    Ok(())
}
