use crate::{
    error::ShellError,
    models::{ThemeName, User},
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use uuid::Uuid;

/// Repository Trait
///
/// The contract the shell needs from its external stores: the session store (who is
/// this viewer, what role do they hold) and the theme store (which theme did they pick).
/// Handlers and extractors only see `Arc<dyn Repository>`, so Postgres and the in-memory
/// store are interchangeable.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Session Store ---
    async fn get_user(&self, id: Uuid) -> Option<User>;

    // --- Theme Store ---
    // Returns the raw persisted value; validation happens in the shell.
    async fn get_theme(&self, user_id: Uuid) -> Result<Option<String>, ShellError>;
    async fn set_theme(&self, user_id: Uuid, theme: ThemeName) -> Result<(), ShellError>;
}

/// RepositoryState
///
/// The concrete type used to share store access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// Backed by the `public.profiles` table (`id`, `email`, `role`, `theme`).
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        sqlx::query_as::<_, User>("SELECT id, email, role, theme FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_user error: {:?}", e);
                None
            })
    }

    async fn get_theme(&self, user_id: Uuid) -> Result<Option<String>, ShellError> {
        let theme: Option<Option<String>> =
            sqlx::query_scalar::<_, Option<String>>("SELECT theme FROM profiles WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("get_theme error: {:?}", e);
                    ShellError::Store(e.to_string())
                })?;

        Ok(theme.flatten())
    }

    /// set_theme
    ///
    /// Updates the viewer's profile row. A missing profile is reported as a store error
    /// rather than silently creating one.
    async fn set_theme(&self, user_id: Uuid, theme: ThemeName) -> Result<(), ShellError> {
        let result = sqlx::query("UPDATE profiles SET theme = $1 WHERE id = $2")
            .bind(theme.as_str())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("set_theme error: {:?}", e);
                ShellError::Store(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(ShellError::Store(format!("no profile for user {}", user_id)));
        }
        Ok(())
    }
}

/// InMemoryRepository
///
/// A process-local store used for local runs without a database and for tests.
#[derive(Default)]
pub struct InMemoryRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with the given profiles.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users.into_iter().map(|user| (user.id, user)).collect();
        Self {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.read().ok()?.get(&id).cloned()
    }

    async fn get_theme(&self, user_id: Uuid) -> Result<Option<String>, ShellError> {
        let users = self
            .users
            .read()
            .map_err(|_| ShellError::Store("user map lock poisoned".to_string()))?;
        Ok(users.get(&user_id).and_then(|user| user.theme.clone()))
    }

    async fn set_theme(&self, user_id: Uuid, theme: ThemeName) -> Result<(), ShellError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| ShellError::Store("user map lock poisoned".to_string()))?;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| ShellError::Store(format!("no profile for user {}", user_id)))?;
        user.theme = Some(theme.as_str().to_string());
        Ok(())
    }
}
