use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, Uri, header},
    response::{IntoResponse, Redirect},
};

use crate::{
    AccessGate,
    auth::{Session, expired_credential_cookie},
    error::AppError,
    models::{LoginView, PageView, find_page},
};

/// [Public Route] Reached only without a credential; the gate bounces signed-in clients
/// to the landing page before this runs.
pub async fn login_page() -> Json<LoginView> {
    Json(LoginView {
        page: "login",
        title: "Sign in to GreazeBook",
    })
}

/// [Public Route] Expires the credential cookie and sends the client to the login page.
/// Excluded from the gate so every role can reach it.
pub async fn logout(State(gate): State<AccessGate>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, expired_credential_cookie());

    (headers, Redirect::temporary(&gate.policy().login_path))
}

/// [Gated Route] `/` has no page of its own.
pub async fn root(State(gate): State<AccessGate>) -> Redirect {
    Redirect::temporary(&gate.policy().default_path)
}

/// panel_page
///
/// [Gated Route] Renders the catalog page the request path falls under. The session is
/// absent only when the gate was bypassed for this path.
pub async fn panel_page(
    uri: Uri,
    session: Option<Extension<Session>>,
) -> Result<Json<PageView>, AppError> {
    let path = uri.path();
    let page = find_page(path).ok_or_else(|| AppError::PageNotFound(path.to_string()))?;
    let session = session.map(|Extension(s)| s);

    Ok(Json(PageView::new(page, path, session.as_ref())))
}
