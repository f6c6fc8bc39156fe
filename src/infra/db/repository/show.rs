use super::{DbConn, lock};
use crate::domain::{Show, ShowId};
use anyhow::Result;
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row};

const SHOW_COLUMNS: &str =
    "show_id, title, overview, poster_path, release_date, runtime, user_rating, genres";

#[derive(Clone)]
pub struct ShowRepository {
    conn: DbConn,
}

impl ShowRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Insert unless a show with the same id exists. Returns whether a row
    /// was written.
    pub fn insert(&self, show: &Show) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO shows (
                show_id, title, overview, poster_path, release_date, runtime, user_rating, genres
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            rusqlite::params![
                show.show_id,
                show.title,
                show.overview,
                show.poster_path,
                show.release_date,
                show.runtime,
                f64::from(show.user_rating),
                serde_json::to_string(&show.genres)?,
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Replace every field of an existing show. Missing shows are left alone.
    pub fn update(&self, show: &Show) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let updated = conn.execute(
            r#"
            UPDATE shows SET
                title = ?2, overview = ?3, poster_path = ?4, release_date = ?5,
                runtime = ?6, user_rating = ?7, genres = ?8
            WHERE show_id = ?1
            "#,
            rusqlite::params![
                show.show_id,
                show.title,
                show.overview,
                show.poster_path,
                show.release_date,
                show.runtime,
                f64::from(show.user_rating),
                serde_json::to_string(&show.genres)?,
            ],
        )?;
        Ok(updated > 0)
    }

    pub fn update_rating(&self, id: ShowId, rating: f32) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let updated = conn.execute(
            "UPDATE shows SET user_rating = ?2 WHERE show_id = ?1",
            rusqlite::params![id, f64::from(rating)],
        )?;
        Ok(updated > 0)
    }

    /// Delete a show; list memberships cascade.
    pub fn delete(&self, id: ShowId) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let affected = conn.execute("DELETE FROM shows WHERE show_id = ?1", [id])?;
        Ok(affected > 0)
    }

    pub fn find_all(&self) -> Result<Vec<Show>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SHOW_COLUMNS} FROM shows ORDER BY show_id"
        ))?;
        let rows = stmt.query_map([], Self::row_to_show)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn find_by_id(&self, id: ShowId) -> Result<Option<Show>> {
        let conn = lock(&self.conn)?;
        let show = conn
            .query_row(
                &format!("SELECT {SHOW_COLUMNS} FROM shows WHERE show_id = ?1"),
                [id],
                Self::row_to_show,
            )
            .optional()?;
        Ok(show)
    }

    /// Shows belonging to `list_name`, in the order they were added.
    pub fn find_by_list(&self, list_name: &str) -> Result<Vec<Show>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.show_id, s.title, s.overview, s.poster_path, s.release_date,
                   s.runtime, s.user_rating, s.genres
            FROM shows s
            JOIN list_shows ls ON ls.show_id = s.show_id
            WHERE ls.list_name = ?1
            ORDER BY ls.added_at, s.show_id
            "#,
        )?;
        let rows = stmt.query_map([list_name], Self::row_to_show)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn row_to_show(row: &Row) -> rusqlite::Result<Show> {
        let rating: f64 = row.get(6)?;
        let genres: String = row.get(7)?;
        let genres: Vec<String> = serde_json::from_str(&genres)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

        Ok(Show {
            show_id: row.get(0)?,
            title: row.get(1)?,
            overview: row.get(2)?,
            poster_path: row.get(3)?,
            release_date: row.get(4)?,
            runtime: row.get(5)?,
            user_rating: rating as f32,
            genres,
        })
    }
}
