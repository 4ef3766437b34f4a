use crate::models::{AccessDecision, Identity, Role, RoleSet};

/// Where unauthenticated viewers are sent.
pub const LOGIN_PATH: &str = "/login";

/// Landing path for viewers without a recognized role.
pub const FALLBACK_PATH: &str = "/";

/// evaluate
///
/// Decides whether `identity` may see the view at `current_location`.
///
/// - Unauthenticated viewers are redirected to the login page, with the requested
///   location carried in `from` so the login flow can return them afterwards.
/// - When `allowed_roles` is present, a viewer whose role is absent or not a member is
///   redirected to their own dashboard. An empty set admits nobody.
/// - Everyone else is allowed.
///
/// Pure: the same three inputs always produce the same decision.
pub fn evaluate(
    identity: &Identity,
    allowed_roles: Option<&RoleSet>,
    current_location: &str,
) -> AccessDecision {
    if !identity.is_authenticated {
        return AccessDecision::RedirectTo {
            path: LOGIN_PATH.to_string(),
            from: Some(current_location.to_string()),
        };
    }

    if let Some(allowed) = allowed_roles {
        let admitted = identity
            .role
            .as_ref()
            .is_some_and(|role| allowed.contains(role));

        if !admitted {
            return AccessDecision::RedirectTo {
                path: default_dashboard_for(identity.role.as_ref()).to_string(),
                from: None,
            };
        }
    }

    AccessDecision::Allow
}

/// default_dashboard_for
///
/// Total over every role value: each recognized role has a fixed dashboard, anything
/// else (unrecognized or absent) lands on `/`.
pub fn default_dashboard_for(role: Option<&Role>) -> &'static str {
    match role {
        Some(Role::Farmer) => "/farmer",
        Some(Role::Buyer) => "/buyer",
        Some(Role::Admin) => "/admin",
        Some(Role::Unrecognized(_)) | None => FALLBACK_PATH,
    }
}
