//! tripplan server binary.
//!
//! Reads config from the environment, runs migrations, then serves until
//! SIGINT/SIGTERM. Any startup failure exits with status 1.

use std::time::Instant;

use tracing_subscriber::{fmt, EnvFilter};

use tripplan_core::error::Result;
use tripplan_server::{bootstrap, config, migrate::NoMigrations, router::ApiRoutes};

#[tokio::main]
async fn main() {
    let started = Instant::now();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = run(started).await {
        tracing::error!(code = e.code().as_str(), error = %e, "tripplan-server failed");
        std::process::exit(1);
    }
}

async fn run(started: Instant) -> Result<()> {
    let cfg = config::load_from_env()?;
    bootstrap::start(cfg, started, &NoMigrations, ApiRoutes::new()).await
}
