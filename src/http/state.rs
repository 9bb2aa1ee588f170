//! Application state shared across handlers.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::config::settings::Settings;
use crate::errors::{Error, Result};
use crate::http::error::AppError;

/// Application state shared across all handlers.
///
/// Built once in `main` from the loaded settings and the opened database,
/// and cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    settings: Settings,
    db: DatabaseConnection,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(settings: Settings, db: DatabaseConnection) -> Self {
        Self {
            inner: Arc::new(AppStateInner { settings, db }),
        }
    }

    /// Get a reference to the service settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.inner.db
    }

    /// Closes the database pool once no other handle to the state remains.
    ///
    /// Call after the server has stopped; a state still shared with a live
    /// router is left open.
    pub async fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.inner) {
            Ok(inner) => inner.db.close().await?,
            Err(_) => warn!("Application state still in use, database left open"),
        }
        Ok(())
    }

    /// Wraps a core error for the client, attaching diagnostics in development.
    #[must_use]
    pub fn error(&self, error: Error) -> AppError {
        AppError::new(error, self.settings().expose_error_details())
    }
}
