//! Process lifecycle: migrate, bind, serve, drain.
//!
//! Every startup failure is returned to the caller; nothing here retries.
//! Connections are tracked in a `JoinSet` so the drain grace period is a hard
//! bound: whatever is still open when it elapses is aborted.

use std::future::Future;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

use tripplan_core::error::Result;

use crate::app_state::AppState;
use crate::config::AppConfig;
use crate::migrate::Migrator;
use crate::router::{self, ApiRoutes};

/// Migrated, bound, not yet accepting.
pub struct Bound {
    listener: TcpListener,
    app: Router,
    state: AppState,
}

impl Bound {
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn serve<S>(self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        serve(self.listener, self.app, self.state, shutdown).await
    }
}

/// Run until SIGINT/SIGTERM. `started` is the process start, reported as `uptime`.
pub async fn start(
    cfg: AppConfig,
    started: Instant,
    migrator: &dyn Migrator,
    api: ApiRoutes,
) -> Result<()> {
    start_with_shutdown(cfg, started, migrator, api, shutdown_signal()).await
}

pub async fn start_with_shutdown<S>(
    cfg: AppConfig,
    started: Instant,
    migrator: &dyn Migrator,
    api: ApiRoutes,
    shutdown: S,
) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    bind(cfg, started, migrator, api).await?.serve(shutdown).await
}

/// Validate the listen address, run migrations once, then bind.
pub async fn bind(
    cfg: AppConfig,
    started: Instant,
    migrator: &dyn Migrator,
    api: ApiRoutes,
) -> Result<Bound> {
    let listen = cfg.server.listen_addr()?;

    tracing::info!(migrator = migrator.name(), "running migrations");
    migrator.run().await?;

    let state = AppState::with_start(cfg, started);
    let app = router::build_router(state.clone(), api);

    let listener = TcpListener::bind(listen).await?;
    tracing::info!(listen = %listener.local_addr()?, "tripplan-server starting");

    Ok(Bound { listener, app, state })
}

/// Serve until `shutdown` resolves, then let in-flight requests finish for at
/// most `server.shutdown_grace_ms`. Connections still open after that are aborted.
pub async fn serve<S>(listener: TcpListener, app: Router, state: AppState, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let grace = Duration::from_millis(state.cfg().server.shutdown_grace_ms);
    let builder = Builder::new(TokioExecutor::new());
    let graceful = GracefulShutdown::new();
    let mut conns = JoinSet::new();
    let mut shutdown = std::pin::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(a) => a,
                    Err(e) => {
                        tracing::warn!(error = %e, "accept failed");
                        continue;
                    }
                };
                let svc = TowerToHyperService::new(app.clone());
                let conn = builder
                    .serve_connection_with_upgrades(TokioIo::new(stream), svc)
                    .into_owned();
                let conn = graceful.watch(conn);
                conns.spawn(async move {
                    if let Err(e) = conn.await {
                        tracing::debug!(%peer, error = %e, "connection closed with error");
                    }
                });
            }
            _ = &mut shutdown => break,
        }
        while conns.try_join_next().is_some() {}
    }

    drop(listener);
    state.set_draining();
    tracing::info!(open = conns.len(), "shutdown requested; draining");

    tokio::select! {
        _ = graceful.shutdown() => tracing::info!("all connections drained"),
        _ = tokio::time::sleep(grace) => {
            tracing::warn!(
                grace_ms = grace.as_millis() as u64,
                open = conns.len(),
                "drain grace elapsed; aborting open connections"
            );
        }
    }
    conns.shutdown().await;

    tracing::info!("server stopped");
    Ok(())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl-c handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
