//! SQLite database setup and connection management for Showtrack
//! Handles database initialization, schema creation, and connection management.

use super::invalidation::InvalidationTracker;
use super::repository::{DbConn, ListShowRepository, ShowRepository, UserListRepository, lock};
use crate::domain::DEFAULT_LISTS;
use crate::infra::app_config::app_data_dir;
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const SCHEMA_VERSION: i32 = 2;

/// Database wrapper that manages the SQLite connection and its change tracker
pub struct Database {
    conn: DbConn,
    tracker: InvalidationTracker,
    path: Option<PathBuf>,
}

impl Database {
    /// Create or open the database at the default location
    pub fn open() -> Result<Self> {
        Self::open_at(Self::default_path())
    }

    /// Create an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            tracker: InvalidationTracker::new(),
            path: None,
        };
        db.init()?;
        Ok(db)
    }

    /// Create or open the database at a specific path
    pub fn open_at(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            tracker: InvalidationTracker::new(),
            path: Some(path),
        };
        db.init()?;
        log::debug!("Opened database at {}", db.describe());
        Ok(db)
    }

    /// `SHOWTRACK_DB_PATH`, else `db.sqlite` in the platform data directory
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("SHOWTRACK_DB_PATH") {
            return PathBuf::from(path);
        }
        app_data_dir().join("db.sqlite")
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn describe(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string())
    }

    /// Initialize database schema
    fn init(&self) -> Result<()> {
        let conn = lock(&self.conn)?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let existing_version: i32 =
            conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        if existing_version == 0 {
            Self::create_schema(&conn)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        } else if existing_version < SCHEMA_VERSION {
            for version in (existing_version + 1)..=SCHEMA_VERSION {
                log::info!("Migrating database to schema version {}", version);
                Self::run_migration(&conn, version)?;
            }
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }

        Ok(())
    }

    /// Get a reference to the connection
    pub fn connection(&self) -> DbConn {
        self.conn.clone()
    }

    pub fn tracker(&self) -> InvalidationTracker {
        self.tracker.clone()
    }

    /// End every live query opened against this database.
    pub fn shutdown(&self) {
        self.tracker.shutdown();
    }

    pub fn show_repo(&self) -> ShowRepository {
        ShowRepository::new(self.connection())
    }

    pub fn list_repo(&self) -> UserListRepository {
        UserListRepository::new(self.connection())
    }

    pub fn list_show_repo(&self) -> ListShowRepository {
        ListShowRepository::new(self.connection())
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS shows (
                show_id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                overview TEXT,
                poster_path TEXT,
                release_date TEXT,
                runtime INTEGER,
                user_rating REAL NOT NULL DEFAULT 0.0,
                genres TEXT NOT NULL DEFAULT '[]'
            );
            "#,
        )?;
        Self::create_list_tables(conn)
    }

    fn create_list_tables(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS user_lists (
                list_name TEXT PRIMARY KEY,
                is_default INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS list_shows (
                list_name TEXT NOT NULL,
                show_id INTEGER NOT NULL,
                added_at TEXT NOT NULL,
                PRIMARY KEY(list_name, show_id),
                FOREIGN KEY(list_name) REFERENCES user_lists(list_name) ON DELETE CASCADE,
                FOREIGN KEY(show_id) REFERENCES shows(show_id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_list_shows_show ON list_shows(show_id);
            "#,
        )?;

        let now = Utc::now().to_rfc3339();
        for name in DEFAULT_LISTS {
            conn.execute(
                "INSERT OR IGNORE INTO user_lists (list_name, is_default, created_at) VALUES (?1, 1, ?2)",
                rusqlite::params![name, now],
            )?;
        }
        Ok(())
    }

    fn run_migration(conn: &Connection, version: i32) -> Result<()> {
        match version {
            1 => conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS shows (
                    show_id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    overview TEXT,
                    poster_path TEXT,
                    release_date TEXT,
                    runtime INTEGER,
                    user_rating REAL NOT NULL DEFAULT 0.0
                );
                "#,
            )?,
            2 => {
                if !Self::column_exists(conn, "shows", "genres")? {
                    conn.execute_batch(
                        "ALTER TABLE shows ADD COLUMN genres TEXT NOT NULL DEFAULT '[]';",
                    )?;
                }
                Self::create_list_tables(conn)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
        for name in names {
            if name? == column {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_database_has_default_lists() -> Result<()> {
        let db = Database::open_in_memory()?;
        let names: Vec<String> = db
            .list_repo()
            .find_all()?
            .into_iter()
            .map(|l| l.list_name)
            .collect();
        assert_eq!(names, vec!["Planning", "Watching", "Completed"]);
        Ok(())
    }

    #[test]
    fn test_reopen_keeps_data_and_version() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("db.sqlite");

        {
            let db = Database::open_at(path.clone())?;
            db.show_repo()
                .insert(&crate::domain::Show::new(1, "Alien"))?;
        }

        let db = Database::open_at(path.clone())?;
        assert_eq!(db.path(), Some(path.as_path()));
        assert_eq!(db.show_repo().find_all()?.len(), 1);
        assert_eq!(db.list_repo().find_all()?.len(), 3);

        let conn = db.connection();
        let conn = lock(&conn)?;
        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        assert_eq!(version, SCHEMA_VERSION);
        Ok(())
    }

    #[test]
    fn test_migrates_version_one_database() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("db.sqlite");

        {
            let conn = Connection::open(&path)?;
            Database::run_migration(&conn, 1)?;
            conn.execute(
                "INSERT INTO shows (show_id, title, user_rating) VALUES (5, 'Heat', 8.5)",
                [],
            )?;
            conn.pragma_update(None, "user_version", 1)?;
        }

        let db = Database::open_at(path)?;
        let show = db.show_repo().find_by_id(5)?.expect("show survives migration");
        assert_eq!(show.title, "Heat");
        assert!(show.genres.is_empty());
        assert_eq!(db.list_repo().find_all()?.len(), 3);
        Ok(())
    }
}
