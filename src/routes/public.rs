use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints any client can reach. `/health` and `/logout` are excluded from the gate
/// by the default route matcher; `/login` is gated but allowed for clients without a
/// credential.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // GET /login
        .route("/login", get(handlers::login_page))
        // GET /logout
        // Expires the `token` cookie and redirects to /login.
        .route("/logout", get(handlers::logout))
}
