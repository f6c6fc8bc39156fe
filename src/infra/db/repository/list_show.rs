use super::{DbConn, lock};
use crate::domain::ShowId;
use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

/// Outcome of adding or moving a show into a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Added,
    AlreadyMember,
    MissingList,
    MissingShow,
}

impl MembershipChange {
    pub fn changed(self) -> bool {
        matches!(self, Self::Added)
    }
}

#[derive(Clone)]
pub struct ListShowRepository {
    conn: DbConn,
}

impl ListShowRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    pub fn add(&self, list_name: &str, show_id: ShowId) -> Result<MembershipChange> {
        let conn = lock(&self.conn)?;
        Self::add_with(&conn, list_name, show_id)
    }

    pub fn remove(&self, list_name: &str, show_id: ShowId) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let affected = conn.execute(
            "DELETE FROM list_shows WHERE list_name = ?1 AND show_id = ?2",
            rusqlite::params![list_name, show_id],
        )?;
        Ok(affected > 0)
    }

    /// Remove the show from `from` and add it to `to` in one transaction.
    ///
    /// Nothing is written when `to` or the show is missing. A show that was
    /// not in `from` is still added to `to`.
    pub fn move_show(&self, from: &str, to: &str, show_id: ShowId) -> Result<MembershipChange> {
        self.move_show_from_any(&[from], to, show_id)
    }

    /// Like [`ListShowRepository::move_show`], leaving every list in `from`.
    /// `to` is never removed, so naming it as a source is a no-op for that
    /// source.
    pub fn move_show_from_any(
        &self,
        from: &[&str],
        to: &str,
        show_id: ShowId,
    ) -> Result<MembershipChange> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;

        let mut removed = 0;
        for source in from.iter().filter(|name| **name != to) {
            removed += tx.execute(
                "DELETE FROM list_shows WHERE list_name = ?1 AND show_id = ?2",
                rusqlite::params![source, show_id],
            )?;
        }
        let outcome = Self::add_with(&tx, to, show_id)?;

        match outcome {
            MembershipChange::MissingList | MembershipChange::MissingShow => {
                tx.rollback()?;
                Ok(outcome)
            }
            MembershipChange::AlreadyMember if removed > 0 => {
                tx.commit()?;
                // A source membership went away, so something changed.
                Ok(MembershipChange::Added)
            }
            _ => {
                tx.commit()?;
                Ok(outcome)
            }
        }
    }

    /// Names of the lists containing the show, default lists first.
    pub fn lists_for_show(&self, show_id: ShowId) -> Result<Vec<String>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT ul.list_name
            FROM list_shows ls
            JOIN user_lists ul ON ul.list_name = ls.list_name
            WHERE ls.show_id = ?1
            ORDER BY ul.is_default DESC,
                     CASE WHEN ul.is_default = 1 THEN ul.rowid END,
                     ul.list_name COLLATE NOCASE
            "#,
        )?;
        let rows = stmt.query_map([show_id], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn add_with(conn: &Connection, list_name: &str, show_id: ShowId) -> Result<MembershipChange> {
        let list_exists = conn
            .query_row(
                "SELECT 1 FROM user_lists WHERE list_name = ?1",
                [list_name],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !list_exists {
            return Ok(MembershipChange::MissingList);
        }

        let show_exists = conn
            .query_row("SELECT 1 FROM shows WHERE show_id = ?1", [show_id], |_| Ok(()))
            .optional()?
            .is_some();
        if !show_exists {
            return Ok(MembershipChange::MissingShow);
        }

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO list_shows (list_name, show_id, added_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![list_name, show_id, Utc::now().to_rfc3339()],
        )?;
        Ok(if inserted > 0 {
            MembershipChange::Added
        } else {
            MembershipChange::AlreadyMember
        })
    }
}
