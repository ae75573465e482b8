/// Router Module Index
///
/// Splits the page routes by how the gate treats them. The gate itself is applied
/// once around the merged router in `create_router`; which paths it inspects is
/// decided by the `RouteMatcher`, not by the router layout.

/// Routes the matcher excludes or the gate always lets through (health, login, logout).
pub mod public;

/// Panel pages. Reached only after the gate allows the request.
pub mod panel;
