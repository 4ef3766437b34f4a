use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Page Router Module
///
/// The marketplace views. Every route here is wrapped in the access guard (see
/// `guard::access_guard`), which consults the route policy: public pages pass straight
/// through, protected ones are gated by authentication and role.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        // Public pages.
        .route("/", get(handlers::home_page))
        .route("/marketplace", get(handlers::marketplace_page))
        .route("/login", get(handlers::login_page))
        // Role dashboards: FARMER, BUYER, ADMIN respectively.
        .route("/farmer", get(handlers::farmer_dashboard))
        .route("/buyer", get(handlers::buyer_dashboard))
        .route("/admin", get(handlers::admin_dashboard))
        // BUYER or ADMIN.
        .route("/orders", get(handlers::orders_page))
        // Any signed-in viewer.
        .route("/profile", get(handlers::profile_page))
}
