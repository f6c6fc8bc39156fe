use crate::application::{Library, ListShowStore, ShowStore, UserListStore};
use crate::infra::app_config::{self, AppConfig};
use crate::infra::db::Database;
use anyhow::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// Everything a front end needs, wired explicitly from a database and a
/// settings value.
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<RwLock<AppConfig>>,
    pub library: Library,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        let library = Library::new(
            Arc::new(ShowStore::new(&db)),
            Arc::new(UserListStore::new(&db)),
            Arc::new(ListShowStore::new(&db)),
        );
        Self {
            db: Arc::new(db),
            config: Arc::new(RwLock::new(config)),
            library,
        }
    }

    /// Open the default database and load the settings file.
    pub fn open() -> Result<Self> {
        let db = Database::open()?;
        Ok(Self::new(db, app_config::load_config()))
    }

    /// Apply `change` to the settings and persist them.
    pub fn update_config<F>(&self, change: F) -> Result<AppConfig>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write();
        change(&mut config);
        app_config::save_config(&config)?;
        Ok(config.clone())
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.db.shutdown();
    }
}
