//! Axum router wiring.
//!
//! Ops endpoints live at the root; auth and trips routers are supplied by
//! their owners and mounted under `/api`. CORS and request tracing wrap
//! everything.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{app_state::AppState, ops, policy};

pub const AUTH_PREFIX: &str = "/api/auth";
pub const TRIPS_PREFIX: &str = "/api/trips";

/// Externally owned route groups.
#[derive(Default)]
pub struct ApiRoutes {
    auth: Option<Router<AppState>>,
    trips: Option<Router<AppState>>,
}

impl ApiRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auth(mut self, routes: Router<AppState>) -> Self {
        self.auth = Some(routes);
        self
    }

    pub fn trips(mut self, routes: Router<AppState>) -> Self {
        self.trips = Some(routes);
        self
    }
}

pub fn build_router(state: AppState, api: ApiRoutes) -> Router {
    let mut router = Router::new()
        .route("/health", get(ops::health))
        .route("/ready", get(ops::ready))
        .route("/metrics", get(ops::metrics));

    if let Some(auth) = api.auth {
        router = router.nest(AUTH_PREFIX, auth);
    }
    if let Some(trips) = api.trips {
        router = router.nest(TRIPS_PREFIX, trips);
    }

    router
        .layer(policy::cors::layer(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
