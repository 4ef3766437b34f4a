use crate::{AppState, handlers};
use axum::{Router, routing::put};

/// Authenticated Router Module
///
/// Routes that act on the signed-in viewer's own profile. The router is wrapped in the
/// `auth_middleware` layer, and the handlers additionally take `AuthUser` for the id.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // PUT /api/me/theme
        // Persists the viewer's theme. Unrecognized themes are rejected with 422.
        .route("/api/me/theme", put(handlers::set_theme))
}
