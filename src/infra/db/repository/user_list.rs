use super::{DbConn, lock};
use crate::domain::UserList;
use anyhow::Result;
use chrono::Utc;
use rusqlite::{OptionalExtension, Row};

#[derive(Clone)]
pub struct UserListRepository {
    conn: DbConn,
}

impl UserListRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Create a custom list. Returns `false` if the name is taken.
    pub fn create(&self, list_name: &str) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO user_lists (list_name, is_default, created_at) VALUES (?1, 0, ?2)",
            rusqlite::params![list_name, Utc::now().to_rfc3339()],
        )?;
        Ok(inserted > 0)
    }

    /// Delete a custom list; default lists are never touched here.
    pub fn delete_custom(&self, list_name: &str) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let affected = conn.execute(
            "DELETE FROM user_lists WHERE list_name = ?1 AND is_default = 0",
            [list_name],
        )?;
        Ok(affected > 0)
    }

    /// Default lists in creation order, then custom lists by name.
    pub fn find_all(&self) -> Result<Vec<UserList>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT list_name, is_default, created_at
            FROM user_lists
            ORDER BY is_default DESC,
                     CASE WHEN is_default = 1 THEN rowid END,
                     list_name COLLATE NOCASE
            "#,
        )?;
        let rows = stmt.query_map([], Self::row_to_list)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn find_by_name(&self, list_name: &str) -> Result<Option<UserList>> {
        let conn = lock(&self.conn)?;
        let list = conn
            .query_row(
                "SELECT list_name, is_default, created_at FROM user_lists WHERE list_name = ?1",
                [list_name],
                Self::row_to_list,
            )
            .optional()?;
        Ok(list)
    }

    fn row_to_list(row: &Row) -> rusqlite::Result<UserList> {
        Ok(UserList {
            list_name: row.get(0)?,
            is_default: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}
