//! Database migration bootstrap.
//!
//! Schema management belongs to the persistence layer; the server only needs
//! to run it once, before it starts accepting connections.

use async_trait::async_trait;

use tripplan_core::error::Result;

#[async_trait]
pub trait Migrator: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &'static str;
    async fn run(&self) -> Result<()>;
}

/// Used when no persistence layer is linked in.
#[derive(Debug, Default)]
pub struct NoMigrations;

#[async_trait]
impl Migrator for NoMigrations {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn run(&self) -> Result<()> {
        tracing::info!("no migrations registered; skipping");
        Ok(())
    }
}
