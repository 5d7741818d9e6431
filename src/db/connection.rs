use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".race-league-tracker";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "scores.sqlite";

/// Ensure the database file exists, run lazy migrations, and return a live
/// connection. The schema statements are idempotent so this is safe to call on
/// every startup without tracking a version number.
pub fn ensure_schema() -> Result<Connection> {
    let db_path = db_path()?;

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
    apply_schema(&conn)?;

    Ok(conn)
}

/// Open a throwaway in-memory database with the same schema. Used by tests so
/// they exercise the exact statements production runs against.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// Create the `scores` table and its secondary index. The `upload_id` index
/// backs the batch-undo delete, which must find every row of one CSV import
/// without scanning the whole table.
fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS scores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            league TEXT NOT NULL,
            circuit TEXT NOT NULL,
            player TEXT NOT NULL,
            score REAL NOT NULL,
            completed INTEGER NOT NULL,
            upload_id TEXT
        )",
        [],
    )
    .context("failed to create scores table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS scores_upload_id ON scores(upload_id)",
        [],
    )
    .context("failed to create upload id index")?;

    Ok(())
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
