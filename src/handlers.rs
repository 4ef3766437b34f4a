use crate::{
    AppState,
    auth::{AuthUser, Viewer},
    error::ShellError,
    gate,
    models::{
        AccessDecision, DrawerState, NavEntry, NavigateRequest, PageResponse, ShellView,
        ThemeRequest, ThemeResponse,
    },
    routes::policy::RouteAccess,
    shell,
};
use axum::{
    Json,
    extract::{OriginalUri, Query, State},
};
use serde::Deserialize;

// --- Query Structs ---

/// AccessQuery
///
/// Query parameters for GET /api/access.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct AccessQuery {
    /// The location the client router is about to render (path plus optional query).
    pub location: String,
}

// --- Shared Helpers ---

/// shell_for
///
/// Builds the shell view a viewer sees at `location`: their theme, the matching sidebar
/// entry, and a closed drawer (arriving at a page is a navigation).
pub async fn shell_for(state: &AppState, viewer: &Viewer, location: &str) -> ShellView {
    let theme = state.themes.current_theme(viewer.user_id).await;
    ShellView::mount(theme).navigate(&state.nav, location)
}

/// decide
///
/// Runs the route policy and, for protected views, the access gate.
pub fn decide(state: &AppState, viewer: &Viewer, location: &str) -> AccessDecision {
    match state.policy.access_for(location) {
        RouteAccess::Public => AccessDecision::Allow,
        RouteAccess::Protected(roles) => {
            gate::evaluate(&viewer.identity, roles.as_ref(), location)
        }
    }
}

async fn page(
    state: &AppState,
    viewer: &Viewer,
    uri: &OriginalUri,
    view: &str,
) -> Json<PageResponse> {
    let shell = shell_for(state, viewer, uri.0.path()).await;
    Json(PageResponse {
        view: view.to_string(),
        shell,
    })
}

// --- Page Handlers ---
// Every page sits behind the access guard; by the time these run the viewer is allowed.

/// home_page
///
/// [Public Route] The landing page.
pub async fn home_page(
    viewer: Viewer,
    State(state): State<AppState>,
    uri: OriginalUri,
) -> Json<PageResponse> {
    page(&state, &viewer, &uri, "home").await
}

/// marketplace_page
///
/// [Public Route] The product marketplace.
pub async fn marketplace_page(
    viewer: Viewer,
    State(state): State<AppState>,
    uri: OriginalUri,
) -> Json<PageResponse> {
    page(&state, &viewer, &uri, "marketplace").await
}

/// login_page
///
/// [Public Route] Sign-in page; guarded viewers land here with `from` set.
pub async fn login_page(
    viewer: Viewer,
    State(state): State<AppState>,
    uri: OriginalUri,
) -> Json<PageResponse> {
    page(&state, &viewer, &uri, "login").await
}

/// farmer_dashboard
///
/// [Farmer Route] Listings and sales for the signed-in farmer.
pub async fn farmer_dashboard(
    viewer: Viewer,
    State(state): State<AppState>,
    uri: OriginalUri,
) -> Json<PageResponse> {
    page(&state, &viewer, &uri, "farmer-dashboard").await
}

/// buyer_dashboard
///
/// [Buyer Route] Purchases and saved listings for the signed-in buyer.
pub async fn buyer_dashboard(
    viewer: Viewer,
    State(state): State<AppState>,
    uri: OriginalUri,
) -> Json<PageResponse> {
    page(&state, &viewer, &uri, "buyer-dashboard").await
}

/// admin_dashboard
///
/// [Admin Route] Marketplace administration.
pub async fn admin_dashboard(
    viewer: Viewer,
    State(state): State<AppState>,
    uri: OriginalUri,
) -> Json<PageResponse> {
    page(&state, &viewer, &uri, "admin-dashboard").await
}

/// orders_page
///
/// [Buyer/Admin Route] Order history.
pub async fn orders_page(
    viewer: Viewer,
    State(state): State<AppState>,
    uri: OriginalUri,
) -> Json<PageResponse> {
    page(&state, &viewer, &uri, "orders").await
}

/// profile_page
///
/// [Authenticated Route] The viewer's own profile, for any role.
pub async fn profile_page(
    viewer: Viewer,
    State(state): State<AppState>,
    uri: OriginalUri,
) -> Json<PageResponse> {
    page(&state, &viewer, &uri, "profile").await
}

// --- Shell API Handlers ---

/// get_nav
///
/// [Public Route] The sidebar entries, in display order.
#[utoipa::path(
    get,
    path = "/api/nav",
    responses((status = 200, description = "Navigation entries", body = [NavEntry]))
)]
pub async fn get_nav(State(state): State<AppState>) -> Json<Vec<NavEntry>> {
    Json(state.nav.entries().to_vec())
}

/// get_access
///
/// [Public Route] The gate's decision for the requesting viewer at `location`, for client
/// routers that guard views themselves. Uses the same route policy as the page guard.
#[utoipa::path(
    get,
    path = "/api/access",
    params(AccessQuery),
    responses((status = 200, description = "Access decision", body = AccessDecision))
)]
pub async fn get_access(
    viewer: Viewer,
    State(state): State<AppState>,
    Query(query): Query<AccessQuery>,
) -> Json<AccessDecision> {
    Json(decide(&state, &viewer, &query.location))
}

/// navigate_shell
///
/// [Public Route] The shell view after navigating to `location`. The drawer is always
/// closed in the result.
#[utoipa::path(
    post,
    path = "/api/shell/navigate",
    request_body = NavigateRequest,
    responses((status = 200, description = "Shell view", body = ShellView))
)]
pub async fn navigate_shell(
    viewer: Viewer,
    State(state): State<AppState>,
    Json(payload): Json<NavigateRequest>,
) -> Json<ShellView> {
    Json(shell_for(&state, &viewer, &payload.location).await)
}

/// toggle_drawer
///
/// [Public Route] Flips the mobile drawer state.
#[utoipa::path(
    post,
    path = "/api/shell/drawer",
    request_body = DrawerState,
    responses((status = 200, description = "Toggled drawer state", body = DrawerState))
)]
pub async fn toggle_drawer(Json(payload): Json<DrawerState>) -> Json<DrawerState> {
    Json(DrawerState {
        drawer_open: shell::toggle_drawer(payload.drawer_open),
    })
}

/// get_theme
///
/// [Public Route] The requesting viewer's effective theme; anonymous viewers get the
/// configured fallback.
#[utoipa::path(
    get,
    path = "/api/theme",
    responses((status = 200, description = "Current theme", body = ThemeResponse))
)]
pub async fn get_theme(viewer: Viewer, State(state): State<AppState>) -> Json<ThemeResponse> {
    let theme = state.themes.current_theme(viewer.user_id).await;
    Json(ThemeResponse { theme })
}

/// set_theme
///
/// [Authenticated Route] Persists the viewer's theme choice. An unrecognized theme is
/// rejected with 422 and the stored theme is left untouched.
#[utoipa::path(
    put,
    path = "/api/me/theme",
    request_body = ThemeRequest,
    responses(
        (status = 200, description = "Theme updated", body = ThemeResponse),
        (status = 401, description = "Not signed in"),
        (status = 422, description = "Unrecognized theme", body = crate::models::ErrorResponse)
    )
)]
pub async fn set_theme(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ThemeRequest>,
) -> Result<Json<ThemeResponse>, ShellError> {
    let theme = state.themes.set_theme(id, &payload.theme).await?;
    Ok(Json(ThemeResponse { theme }))
}
