use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Panel Router Module
///
/// The role-gated panel. Every section page (and anything below it, such as
/// `/operations/bookings/123`) is resolved from the page catalog by the fallback
/// handler, so adding a section only touches `models::PANEL_PAGES`.
pub fn panel_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Sends the client on to the default landing page.
        .route("/", get(handlers::root))
        .fallback(handlers::panel_page)
}
