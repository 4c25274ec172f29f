#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use tripplan_server::app_state::AppState;
use tripplan_server::config;
use tripplan_server::router::{build_router, ApiRoutes};

fn state(origins: &str) -> AppState {
    let yaml = format!("cors:\n  allowed_origins: \"{origins}\"\n");
    AppState::new(config::load_from_str(&yaml).unwrap())
}

fn app(state: AppState) -> Router {
    build_router(state, ApiRoutes::new())
}

async fn send(app: Router, req: Request<Body>) -> Response {
    app.oneshot(req).await.unwrap()
}

fn get_with_origin(uri: &str, origin: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().method(Method::GET).uri(uri);
    if let Some(o) = origin {
        b = b.header(header::ORIGIN, o);
    }
    b.body(Body::empty()).unwrap()
}

async fn body_string(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_reports_ok_timestamp_and_uptime() {
    let resp = send(app(state("http://a.com")), get_with_origin("/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["uptime"].as_f64().unwrap() >= 0.0);

    let ts = json["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "timestamp {ts}");
    assert!(ts.ends_with('Z'));
}

#[tokio::test]
async fn same_origin_request_gets_no_cors_headers() {
    let resp = send(app(state("http://a.com")), get_with_origin("/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn allowed_origin_is_echoed_with_credentials() {
    let resp = send(
        app(state("http://a.com, http://b.com")),
        get_with_origin("/health", Some("http://b.com")),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://b.com");
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn unknown_origin_is_served_without_grant() {
    let resp = send(
        app(state("http://a.com")),
        get_with_origin("/health", Some("http://evil.com")),
    )
    .await;

    // silent non-grant: the handler still runs
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
    assert!(body_string(resp).await.contains("\"ok\""));
}

#[tokio::test]
async fn empty_origin_list_denies_every_cross_origin_request() {
    let st = state("");
    let resp = send(app(st.clone()), get_with_origin("/health", Some("http://localhost:5173"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

    let resp = send(app(st), get_with_origin("/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_origin_header_gets_no_cors_headers() {
    let st = state("http://a.com");
    let resp = send(app(st.clone()), get_with_origin("/health", Some(""))).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
    assert_eq!(st.metrics().cors_decisions.get(&[("decision", "denied")]), 0);
}

#[tokio::test]
async fn preflight_for_allowed_origin() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/health")
        .header(header::ORIGIN, "http://a.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,authorization")
        .body(Body::empty())
        .unwrap();

    let resp = send(app(state("http://a.com")), req).await;
    assert!(resp.status().is_success());

    let h = resp.headers();
    assert_eq!(h[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://a.com");
    assert_eq!(h[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert!(h[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap().contains("POST"));
    assert_eq!(h[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type,authorization");
    assert_eq!(h[header::ACCESS_CONTROL_MAX_AGE], "600");
}

#[tokio::test]
async fn preflight_for_unknown_origin_has_no_grant() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/health")
        .header(header::ORIGIN, "http://evil.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .body(Body::empty())
        .unwrap();

    let resp = send(app(state("http://a.com")), req).await;
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
}

#[tokio::test]
async fn credentials_header_omitted_when_disabled() {
    let cfg = config::load_from_str(
        "cors:\n  allowed_origins: \"http://a.com\"\n  allow_credentials: false\n",
    )
    .unwrap();
    let resp = send(
        app(AppState::new(cfg)),
        get_with_origin("/health", Some("http://a.com")),
    )
    .await;
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://a.com");
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
}

#[tokio::test]
async fn api_routes_are_mounted_behind_the_filter() {
    let trips: Router<AppState> = Router::new().route("/", get(|| async { "[]" }));
    let auth: Router<AppState> = Router::new().route("/me", get(|| async { "anonymous" }));
    let api = ApiRoutes::new().trips(trips).auth(auth);
    let st = state("http://a.com");

    let resp = send(
        build_router(st.clone(), api),
        get_with_origin("/api/auth/me", Some("http://a.com")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://a.com");
    assert_eq!(body_string(resp).await, "anonymous");

    let trips: Router<AppState> = Router::new().route("/", get(|| async { "[]" }));
    let resp = send(
        build_router(st, ApiRoutes::new().trips(trips)),
        get_with_origin("/api/trips", None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "[]");
}

#[tokio::test]
async fn unmounted_api_routes_are_not_found() {
    let resp = send(app(state("http://a.com")), get_with_origin("/api/trips", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ready_flips_to_503_when_draining() {
    let st = state("http://a.com");
    let resp = send(app(st.clone()), get_with_origin("/ready", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    st.set_draining();
    let resp = send(app(st), get_with_origin("/ready", None)).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_string(resp).await, "draining");
}

#[tokio::test]
async fn metrics_count_admission_decisions() {
    let st = state("http://a.com");
    send(app(st.clone()), get_with_origin("/health", Some("http://a.com"))).await;
    send(app(st.clone()), get_with_origin("/health", Some("http://x.com"))).await;
    send(app(st.clone()), get_with_origin("/health", Some("http://y.com"))).await;

    assert_eq!(st.metrics().cors_decisions.get(&[("decision", "admitted")]), 1);
    assert_eq!(st.metrics().cors_decisions.get(&[("decision", "denied")]), 2);

    let resp = send(app(st), get_with_origin("/metrics", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
    let body = body_string(resp).await;
    assert!(body.contains("tripplan_cors_decisions_total{decision=\"denied\"} 2"));
    assert!(body.contains("tripplan_health_checks_total{} 3"));
    assert!(body.contains("tripplan_draining 0"));
}
