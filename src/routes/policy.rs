use crate::models::{Role, RoleSet};

/// RouteAccess
///
/// What a view demands from its viewer before it may render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Anyone, signed in or not. The gate is not consulted.
    Public,
    /// A signed-in viewer; when the set is present, their role must be in it.
    Protected(Option<RoleSet>),
}

impl RouteAccess {
    pub fn roles(roles: &[Role]) -> Self {
        RouteAccess::Protected(Some(roles.iter().cloned().collect()))
    }

    pub fn signed_in() -> Self {
        RouteAccess::Protected(None)
    }
}

static PUBLIC: RouteAccess = RouteAccess::Public;

/// RoutePolicy
///
/// Maps location prefixes to their access requirement. Locations and prefixes are
/// compared in normalized form (see [`normalize_path`]). A prefix matches a location
/// whose path equals it or continues with `/`; the longest matching prefix wins and
/// unmatched locations are public.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    rules: Vec<(String, RouteAccess)>,
}

impl RoutePolicy {
    pub fn new(rules: Vec<(String, RouteAccess)>) -> Self {
        let rules = rules
            .into_iter()
            .map(|(prefix, access)| (normalize_path(&prefix), access))
            .collect();
        Self { rules }
    }

    /// The marketplace's view-to-role table.
    pub fn marketplace() -> Self {
        Self::new(vec![
            ("/farmer".to_string(), RouteAccess::roles(&[Role::Farmer])),
            ("/buyer".to_string(), RouteAccess::roles(&[Role::Buyer])),
            ("/admin".to_string(), RouteAccess::roles(&[Role::Admin])),
            (
                "/orders".to_string(),
                RouteAccess::roles(&[Role::Buyer, Role::Admin]),
            ),
            ("/profile".to_string(), RouteAccess::signed_in()),
        ])
    }

    /// Access requirement for `location`. Any query string or fragment is ignored.
    pub fn access_for(&self, location: &str) -> &RouteAccess {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or(location);
        let path = normalize_path(path);

        self.rules
            .iter()
            .filter(|(prefix, _)| prefix_matches(prefix, &path))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, access)| access)
            .unwrap_or(&PUBLIC)
    }
}

/// normalize_path
///
/// Canonical form of a location path as client routers resolve it: percent-decoded,
/// lowercase, rooted, with empty and `.` segments dropped and `..` resolved.
/// `/ADMIN`, `//admin/`, `admin` and `/shop/../admin` all normalize to `/admin`.
pub fn normalize_path(path: &str) -> String {
    let decoded = urlencoding::decode(path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.to_string());

    let mut segments: Vec<String> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other.to_lowercase()),
        }
    }

    format!("/{}", segments.join("/"))
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
