/// Router Module Index
///
/// Routing is split by what a request needs from its viewer. Access control is applied
/// at the module level through axum layers, so a route cannot be exposed by accident.

/// Shell API endpoints open to anonymous and signed-in viewers alike.
pub mod public;

/// Endpoints that act on the viewer's own profile; require a session.
pub mod authenticated;

/// Marketplace pages, all behind the access guard.
pub mod pages;

/// The access guard middleware placed in front of the pages.
pub mod guard;

/// The view-to-role table consulted by the guard and by `/api/access`.
pub mod policy;
