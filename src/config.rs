use std::env;

use crate::models::ThemeName;

/// Fallback JWT secret for local runs only.
pub const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

/// AppConfig
///
/// The immutable configuration loaded once at startup and shared through `AppState`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Postgres connection string. `None` locally means the in-memory store is used.
    pub db_url: Option<String>,
    // Runtime environment marker. Controls the local `x-user-id` bypass.
    pub env: Env,
    // Secret used to validate incoming session JWTs (HS256).
    pub jwt_secret: String,
    // Theme applied when the viewer has none stored.
    pub default_theme: ThemeName,
    // Address the HTTP server binds to.
    pub bind_addr: String,
}

/// Env
///
/// Runtime context: local development (bypass header, optional database) or production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Non-panicking configuration for tests; no environment variables are read.
    fn default() -> Self {
        Self {
            db_url: None,
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            default_theme: ThemeName::default(),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Fails fast when a production secret is missing or when `SHELL_DEFAULT_THEME` names
    /// a theme outside the theme set, so the server never starts half-configured.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let (db_url, jwt_secret) = match env {
            Env::Production => (
                Some(env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in prod")),
                env::var("SHELL_JWT_SECRET")
                    .expect("FATAL: SHELL_JWT_SECRET must be set in production."),
            ),
            Env::Local => (
                env::var("DATABASE_URL").ok(),
                env::var("SHELL_JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
            ),
        };

        let default_theme = match env::var("SHELL_DEFAULT_THEME") {
            Ok(raw) => raw
                .parse::<ThemeName>()
                .unwrap_or_else(|e| panic!("FATAL: SHELL_DEFAULT_THEME is invalid: {}", e)),
            Err(_) => ThemeName::default(),
        };

        let bind_addr = env::var("SHELL_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Self {
            db_url,
            env,
            jwt_secret,
            default_theme,
            bind_addr,
        }
    }
}
