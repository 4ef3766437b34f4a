use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Shell API endpoints that any client may call. Anything viewer-specific (theme,
/// access decision) is resolved from the optional session via the `Viewer` extractor.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /api/nav
        // The static sidebar registry, in display order.
        .route("/api/nav", get(handlers::get_nav))
        // GET /api/access?location=...
        // The access gate's decision for a client-side route transition.
        .route("/api/access", get(handlers::get_access))
        // POST /api/shell/navigate
        // Shell view after a navigation: active entry, theme, drawer closed.
        .route("/api/shell/navigate", post(handlers::navigate_shell))
        // POST /api/shell/drawer
        // Toggles the mobile drawer.
        .route("/api/shell/drawer", post(handlers::toggle_drawer))
        // GET /api/theme
        // The viewer's effective theme (fallback for anonymous viewers).
        .route("/api/theme", get(handlers::get_theme))
}
