use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{collections::BTreeSet, fmt, str::FromStr};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ShellError;

// --- Identity & Roles ---

/// Role
///
/// The marketplace's closed set of viewer roles. A raw role string coming from the
/// session store that is not part of the set is kept as `Unrecognized`, so every
/// consumer is forced to handle it explicitly (see `gate::default_dashboard_for`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Farmer,
    Buyer,
    Admin,
    Unrecognized(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Farmer => "FARMER",
            Role::Buyer => "BUYER",
            Role::Admin => "ADMIN",
            Role::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Role::Unrecognized(_))
    }
}

impl From<&str> for Role {
    /// Role strings are matched case-insensitively ("farmer" and "FARMER" are the same role).
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "FARMER" => Role::Farmer,
            "BUYER" => Role::Buyer,
            "ADMIN" => Role::Admin,
            _ => Role::Unrecognized(raw.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Role::from(raw.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of roles a view admits. An empty set admits nobody.
pub type RoleSet = BTreeSet<Role>;

/// Identity
///
/// A read-only snapshot of the session store, taken once per evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    pub is_authenticated: bool,
    pub role: Option<Role>,
}

impl Identity {
    /// An anonymous viewer: not authenticated, no role.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(role: Role) -> Self {
        Self {
            is_authenticated: true,
            role: Some(role),
        }
    }
}

/// User
///
/// The viewer's profile row as held by the session store (`public.profiles`).
/// `theme` is the raw persisted theme value; it is validated on read.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    // The RBAC field: 'FARMER', 'BUYER' or 'ADMIN'.
    pub role: String,
    pub theme: Option<String>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from(self.role.as_str())
    }
}

// --- Shell Schemas ---

/// ThemeName
///
/// The fixed set of visual themes the shell can apply. Unlike role strings, theme
/// names are matched exactly: only the lowercase wire names parse, so `"Dark"` is
/// rejected as `InvalidTheme`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ThemeName {
    Dark,
    #[default]
    Light,
    Forest,
}

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [ThemeName::Dark, ThemeName::Light, ThemeName::Forest];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
            ThemeName::Forest => "forest",
        }
    }
}

impl FromStr for ThemeName {
    type Err = ShellError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ThemeName::ALL
            .into_iter()
            .find(|theme| theme.as_str() == raw)
            .ok_or_else(|| ShellError::InvalidTheme(raw.to_string()))
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// NavEntry
///
/// One static sidebar item. `icon` is a symbolic name resolved by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavEntry {
    #[schema(example = "Marketplace")]
    pub label: String,
    #[schema(example = "/marketplace")]
    pub path: String,
    #[schema(example = "store")]
    pub icon: String,
}

impl NavEntry {
    pub fn new(label: &str, path: &str, icon: &str) -> Self {
        Self {
            label: label.to_string(),
            path: path.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// AccessDecision
///
/// Outcome of one gate evaluation. `from` is only set on the login redirect and carries
/// the originally requested location so the login flow can send the viewer back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "decision", rename_all = "snake_case")]
#[ts(export)]
pub enum AccessDecision {
    Allow,
    RedirectTo { path: String, from: Option<String> },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// redirect_location
    ///
    /// Renders the redirect target as a URL, encoding `from` into the query string
    /// (e.g. `/login?from=%2Fadmin`). Returns `None` for `Allow`.
    pub fn redirect_location(&self) -> Option<String> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::RedirectTo { path, from: None } => Some(path.clone()),
            AccessDecision::RedirectTo {
                path,
                from: Some(from),
            } => Some(format!("{}?from={}", path, urlencoding::encode(from))),
        }
    }
}

/// ShellView
///
/// The derived layout configuration. `active_entry` is the registry entry whose path
/// equals the current location, or `None` on an unregistered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ShellView {
    pub active_entry: Option<NavEntry>,
    pub theme: ThemeName,
    pub drawer_open: bool,
}

// --- Request Payloads (Input Schemas) ---

/// ThemeRequest
///
/// Input payload for PUT /api/theme. The theme is taken as a raw string so that an
/// unknown value reaches the shell's validation instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ThemeRequest {
    #[schema(example = "forest")]
    pub theme: String,
}

/// NavigateRequest
///
/// Input payload for POST /api/shell/navigate.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavigateRequest {
    #[schema(example = "/marketplace")]
    pub location: String,
}

/// DrawerState
///
/// Used both as input and output of POST /api/shell/drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DrawerState {
    pub drawer_open: bool,
}

// --- Response Payloads (Output Schemas) ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ThemeResponse {
    pub theme: ThemeName,
}

/// PageResponse
///
/// What a page route returns: the view being rendered and the shell around it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageResponse {
    #[schema(example = "farmer-dashboard")]
    pub view: String,
    pub shell: ShellView,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
