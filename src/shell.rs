use std::collections::HashSet;
use uuid::Uuid;

use crate::{
    error::ShellError,
    models::{NavEntry, ShellView, ThemeName},
    repository::RepositoryState,
};

// --- Navigation Registry ---

/// NavRegistry
///
/// The ordered, immutable list of sidebar entries. Built once at startup; paths are
/// guaranteed distinct so at most one entry can be active for any location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRegistry {
    entries: Vec<NavEntry>,
}

impl NavRegistry {
    /// Validates that no two entries share a path.
    pub fn new(entries: Vec<NavEntry>) -> Result<Self, ShellError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.path.as_str()) {
                return Err(ShellError::DuplicateNavPath(entry.path.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The marketplace sidebar.
    pub fn marketplace() -> Self {
        Self {
            entries: vec![
                NavEntry::new("Home", "/", "home"),
                NavEntry::new("Marketplace", "/marketplace", "store"),
                NavEntry::new("Farmer Dashboard", "/farmer", "tractor"),
                NavEntry::new("Buyer Dashboard", "/buyer", "basket"),
                NavEntry::new("Orders", "/orders", "receipt"),
                NavEntry::new("Admin", "/admin", "shield"),
                NavEntry::new("Profile", "/profile", "user"),
            ],
        }
    }

    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    pub fn active_entry(&self, location: &str) -> Option<&NavEntry> {
        compute_active_entry(&self.entries, location)
    }
}

/// compute_active_entry
///
/// Exact string match of each entry's path against the location; the first match wins.
/// `None` on an unregistered route.
pub fn compute_active_entry<'a>(entries: &'a [NavEntry], location: &str) -> Option<&'a NavEntry> {
    entries.iter().find(|entry| entry.path == location)
}

pub fn toggle_drawer(current: bool) -> bool {
    !current
}

// --- Shell View Transitions ---

impl ShellView {
    /// A freshly mounted shell: drawer closed, nothing highlighted yet.
    pub fn mount(theme: ThemeName) -> Self {
        Self {
            active_entry: None,
            theme,
            drawer_open: false,
        }
    }

    /// navigate
    ///
    /// Moves the shell to `location`. The drawer only exists for temporary small-viewport
    /// navigation, so every navigation closes it.
    pub fn navigate(self, registry: &NavRegistry, location: &str) -> Self {
        Self {
            active_entry: registry.active_entry(location).cloned(),
            theme: self.theme,
            drawer_open: false,
        }
    }

    pub fn toggle_drawer(self) -> Self {
        Self {
            drawer_open: toggle_drawer(self.drawer_open),
            ..self
        }
    }
}

// --- Theme Selection ---

/// ThemeService
///
/// Reads and writes the viewer's theme through the theme store. Anonymous viewers and
/// viewers without a stored (or with an unreadable) theme get the fallback theme.
#[derive(Clone)]
pub struct ThemeService {
    store: RepositoryState,
    fallback: ThemeName,
}

impl ThemeService {
    pub fn new(store: RepositoryState, fallback: ThemeName) -> Self {
        Self { store, fallback }
    }

    /// current_theme
    ///
    /// Never fails: a store error or a persisted value outside the theme set falls back.
    pub async fn current_theme(&self, viewer: Option<Uuid>) -> ThemeName {
        let Some(user_id) = viewer else {
            return self.fallback;
        };

        match self.store.get_theme(user_id).await {
            Ok(Some(raw)) => raw.parse::<ThemeName>().unwrap_or_else(|_| {
                tracing::warn!(%user_id, theme = %raw, "Stored theme not recognized, using fallback");
                self.fallback
            }),
            Ok(None) => self.fallback,
            Err(e) => {
                tracing::error!(%user_id, "Theme lookup failed: {}", e);
                self.fallback
            }
        }
    }

    /// set_theme
    ///
    /// Validates `requested` before touching the store; an unrecognized theme is
    /// rejected with `InvalidTheme` and the stored theme stays as it was.
    pub async fn set_theme(&self, viewer: Uuid, requested: &str) -> Result<ThemeName, ShellError> {
        let theme: ThemeName = requested.parse()?;
        self.store.set_theme(viewer, theme).await?;
        tracing::debug!(user_id = %viewer, %theme, "Theme updated");
        Ok(theme)
    }
}
