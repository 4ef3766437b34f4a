use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// The decision core: access gate and shell state.
pub mod gate;
pub mod shell;

// Supporting services and the HTTP surface.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

pub mod routes;
use auth::AuthUser;
use routes::{authenticated, guard, pages, policy::RoutePolicy, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::ShellError;
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};
pub use shell::{NavRegistry, ThemeService};

/// ApiDoc
///
/// OpenAPI document for the shell API, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_nav, handlers::get_access, handlers::navigate_shell,
        handlers::toggle_drawer, handlers::get_theme, handlers::set_theme
    ),
    components(
        schemas(
            models::NavEntry, models::AccessDecision, models::ShellView, models::ThemeName,
            models::ThemeRequest, models::ThemeResponse, models::NavigateRequest,
            models::DrawerState, models::PageResponse, models::ErrorResponse,
        )
    ),
    tags(
        (name = "market-shell", description = "Marketplace shell: access gate and layout state")
    )
)]
struct ApiDoc;

/// AppState
///
/// The shared, immutable container of everything a request may need: the stores, the
/// theme service over them, the static nav registry and route policy, and the config.
#[derive(Clone)]
pub struct AppState {
    /// Session and theme store.
    pub repo: RepositoryState,
    /// Theme selection over `repo`, with the configured fallback.
    pub themes: ThemeService,
    /// Sidebar entries; built once, never reloaded.
    pub nav: Arc<NavRegistry>,
    /// View-to-role table used by the page guard and `/api/access`.
    pub policy: Arc<RoutePolicy>,
    pub config: AppConfig,
}

impl AppState {
    /// Assembles the state with the marketplace's nav registry and route policy.
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        let themes = ThemeService::new(repo.clone(), config.default_theme);
        Self {
            repo,
            themes,
            nav: Arc::new(NavRegistry::marketplace()),
            policy: Arc::new(RoutePolicy::marketplace()),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Rejects requests without a session before they reach the authenticated routes;
/// `AuthUser` answers 401 on its own.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the page routes (behind the access guard), the shell API, the Swagger UI
/// and the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Pages: every route consults the route policy and access gate first.
        .merge(
            pages::page_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), guard::access_guard)),
        )
        .with_state(state);

    base_router
        .layer(
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
        .layer(cors)
}

/// trace_span_logger
///
/// Span for each request, correlated by the `x-request-id` set above.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
