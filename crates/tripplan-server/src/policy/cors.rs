//! CORS layer backed by [`OriginFilter`].
//!
//! The filter makes the decision; this module only translates it into
//! tower-http predicates. Requests without an `Origin` header never reach the
//! predicates and pass through untouched. An empty `Origin` is admitted by the
//! filter like an absent one, but there is nothing to echo, so no CORS
//! headers are attached for it either.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowCredentials, AllowHeaders, AllowOrigin, CorsLayer};
use tripplan_core::origin::{Admission, OriginFilter};

use crate::app_state::AppState;
use crate::obs::ServerMetrics;

/// Methods announced in preflight responses.
pub const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::HEAD,
    Method::PUT,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
];

/// Non-visible-ASCII header values cannot match any configured origin.
fn decide(filter: &OriginFilter, origin: &HeaderValue) -> Admission {
    match origin.to_str() {
        Ok(o) => filter.admit(Some(o)),
        Err(_) => Admission::Deny,
    }
}

pub fn layer(state: &AppState) -> CorsLayer {
    build(
        state.origin_filter(),
        state.metrics(),
        Duration::from_secs(state.cfg().cors.max_age_secs),
    )
}

pub fn build(filter: Arc<OriginFilter>, metrics: Arc<ServerMetrics>, max_age: Duration) -> CorsLayer {
    let origin_filter = Arc::clone(&filter);
    let allow_origin = AllowOrigin::predicate(move |origin, _parts| {
        if origin.is_empty() {
            return false;
        }
        let decision = decide(&origin_filter, origin);
        if decision.is_admitted() {
            metrics.cors_decisions.inc(&[("decision", "admitted")]);
        } else {
            metrics.cors_decisions.inc(&[("decision", "denied")]);
            tracing::debug!(origin = ?origin, "cross-origin request not granted");
        }
        decision.is_admitted()
    });

    let allow_credentials = AllowCredentials::predicate(move |origin, _parts| {
        !origin.is_empty() && decide(&filter, origin).allows_credentials()
    });

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(allow_credentials)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(max_age)
}
