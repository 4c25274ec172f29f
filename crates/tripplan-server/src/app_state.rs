//! Shared application state.
//!
//! Holds the validated config, the origin filter built from it, metrics and
//! process lifecycle flags. Everything behind `Arc` is immutable except the
//! atomics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tripplan_core::origin::OriginFilter;

use crate::config::AppConfig;
use crate::obs::ServerMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    filter: Arc<OriginFilter>,
    metrics: Arc<ServerMetrics>,
}

struct AppStateInner {
    cfg: AppConfig,
    started: Instant,
    draining: AtomicBool,
}

impl AppState {
    /// State whose uptime clock starts now.
    pub fn new(cfg: AppConfig) -> Self {
        Self::with_start(cfg, Instant::now())
    }

    /// `started` is the process start; `uptime` is measured from it.
    pub fn with_start(cfg: AppConfig, started: Instant) -> Self {
        let filter = cfg.cors.origin_filter();
        if filter.allowed().is_empty() {
            tracing::warn!("no allowed origins configured; all cross-origin requests will be denied");
        } else {
            let origins: Vec<&str> = filter.allowed().iter().collect();
            tracing::info!(?origins, credentials = cfg.cors.allow_credentials, "cors origins loaded");
        }

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                started,
                draining: AtomicBool::new(false),
            }),
            filter: Arc::new(filter),
            metrics: Arc::new(ServerMetrics::default()),
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn origin_filter(&self) -> Arc<OriginFilter> {
        Arc::clone(&self.filter)
    }

    pub fn metrics(&self) -> Arc<ServerMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn uptime(&self) -> Duration {
        self.inner.started.elapsed()
    }

    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }

    /// Gauge lines appended to the metrics render.
    pub fn metrics_gauges(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("tripplan_uptime_seconds", self.uptime().as_secs_f64()),
            ("tripplan_draining", if self.is_draining() { 1.0 } else { 0.0 }),
        ]
    }
}
