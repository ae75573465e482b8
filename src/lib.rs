use std::sync::Arc;

use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::{HeaderName, header},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod matcher;
pub mod models;
pub mod policy;

pub mod routes;
use routes::{panel, public};

// --- Public Re-exports ---

pub use access::{AccessGate, DecisionReason, Verdict};
pub use auth::{Claims, Session, TokenVerifier};
pub use config::AppConfig;
pub use matcher::RouteMatcher;
pub use policy::{AccessPolicy, Decision, Role};

/// AppState
///
/// Shared, immutable state of the gate service. Cloning is cheap: the policy table,
/// verifier and matcher sit behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// The access decision procedure with its policy table and verifier.
    pub gate: AccessGate,
    /// Which paths the gate inspects at all.
    pub matcher: Arc<RouteMatcher>,
}

impl AppState {
    /// Builds the production policy with a verifier keyed on the configured secret.
    pub fn new(config: &AppConfig) -> Self {
        let gate = AccessGate::new(
            AccessPolicy::greazebook(),
            TokenVerifier::new(&config.jwt_secret),
        );

        Self {
            gate,
            matcher: Arc::new(RouteMatcher::default()),
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for AccessGate {
    fn from_ref(app_state: &AppState) -> AccessGate {
        app_state.gate.clone()
    }
}

impl FromRef<AppState> for Arc<RouteMatcher> {
    fn from_ref(app_state: &AppState) -> Arc<RouteMatcher> {
        app_state.matcher.clone()
    }
}

/// Runs the access decision for every request the route matcher selects.
///
/// - Allow: the resolved `Session` (if any) goes into request extensions and the
///   request continues to its handler.
/// - Redirect: `307` to the login or landing page. If the credential was presented but
///   refused, the response also expires the `token` cookie so a stale cookie cannot keep
///   bouncing the client between `/login` and the landing page.
async fn gate_middleware(
    State(gate): State<AccessGate>,
    State(matcher): State<Arc<RouteMatcher>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if !matcher.is_gated(&path) {
        return next.run(request).await;
    }

    let credential = auth::credential_from_headers(request.headers());
    let verdict = gate.evaluate(&path, credential.as_deref(), Utc::now().timestamp());

    match gate.policy().location(verdict.decision) {
        None => {
            tracing::debug!(path = %path, reason = ?verdict.reason, "access allowed");
            if let Some(session) = verdict.session {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        Some(location) => {
            tracing::info!(
                path = %path,
                location = %location,
                reason = ?verdict.reason,
                "access redirected"
            );
            let mut response = Redirect::temporary(location).into_response();
            if verdict.credential_rejected() {
                response
                    .headers_mut()
                    .insert(header::SET_COOKIE, auth::expired_credential_cookie());
            }
            response
        }
    }
}

/// create_router
///
/// Assembles the page routes, wraps them in the access gate and the observability layers,
/// and registers the application state.
pub fn create_router(state: AppState) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(public::public_routes())
        .merge(panel::panel_routes())
        // Applied to every route and the fallback; the matcher decides what is inspected.
        .layer(middleware::from_fn_with_state(state.clone(), gate_middleware))
        .with_state(state);

    base_router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// Span per request carrying method, path and the `x-request-id` so every log line of one
/// request, including the gate's decision, is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        path = %request.uri().path(),
        req_id = %request_id,
    )
}
