use rusqlite::Connection;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = showtrack::infra::db::Database::default_path();
    run(&db_path)
}

/// Delete every show and custom list, keeping the status lists.
pub fn run(db_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !db_path.exists() {
        println!("Database does not exist at: {}", db_path.display());
        println!("No reset needed.");
        return Ok(());
    }

    println!("Connecting to database at: {}", db_path.display());
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    let tables_exist: i32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='shows'",
        [],
        |row| row.get(0),
    )?;
    if tables_exist == 0 {
        println!("Tables do not exist. No reset needed.");
        return Ok(());
    }

    print_counts(&conn, "Current record counts:")?;

    conn.execute("DELETE FROM list_shows", [])?;
    conn.execute("DELETE FROM shows", [])?;
    conn.execute("DELETE FROM user_lists WHERE is_default = 0", [])?;

    print_counts(&conn, "\nAfter reset:")?;
    println!("Database location: {}", db_path.display());
    Ok(())
}

fn print_counts(conn: &Connection, heading: &str) -> rusqlite::Result<()> {
    let count = |table: &str| -> rusqlite::Result<i64> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
    };
    println!("{heading}");
    println!("  Shows: {}", count("shows")?);
    println!("  Lists: {}", count("user_lists")?);
    println!("  Memberships: {}", count("list_shows")?);
    Ok(())
}
