use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{AppState, auth::Viewer, handlers, models::AccessDecision};

/// access_guard
///
/// Middleware in front of every page. Runs the route policy and access gate for the
/// requested location; on `Allow` the page renders, on `RedirectTo` the viewer gets a
/// `303 See Other` to the target. The login redirect carries the requested location
/// (path and query) as `from`.
pub async fn access_guard(
    State(state): State<AppState>,
    viewer: Viewer,
    request: Request,
    next: Next,
) -> Response {
    let location = requested_location(&request);

    let decision = handlers::decide(&state, &viewer, &location);
    let Some(target) = decision.redirect_location() else {
        return next.run(request).await;
    };

    if let Some(role) = viewer.identity.role.as_ref().filter(|role| !role.is_recognized()) {
        // Only reachable when the session store holds a role outside the known set.
        tracing::warn!(%role, %location, "Viewer has an unrecognized role, redirecting to fallback");
    }

    if let AccessDecision::RedirectTo { path, .. } = &decision {
        tracing::debug!(%location, redirect = %path, "Access denied");
    }

    Redirect::to(&target).into_response()
}

/// The location the viewer asked for, as seen before any router nesting.
fn requested_location(request: &Request) -> String {
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| request.uri());

    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}
