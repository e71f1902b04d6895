//! Transfer history kept in SQLite.

use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::core::collaborators::Recorder;
use crate::core::media::{MediaRecord, Origin, TransferMode};
use crate::error::Result;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transfer_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    origin TEXT NOT NULL,
    mode TEXT NOT NULL,
    source_path TEXT NOT NULL,
    file_name TEXT NOT NULL,
    dest_root TEXT NOT NULL,
    media_type TEXT NOT NULL,
    category TEXT NOT NULL,
    title TEXT NOT NULL,
    year TEXT,
    season_episode TEXT,
    transferred_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS transfer_unknown (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    path TEXT NOT NULL,
    target_dir TEXT,
    recorded_at TEXT NOT NULL
);
";

/// One row of `transfer_history`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub origin: String,
    pub mode: String,
    pub source_path: String,
    pub file_name: String,
    pub dest_root: String,
    pub media_type: String,
    pub category: String,
    pub title: String,
    pub year: Option<String>,
    pub season_episode: Option<String>,
    pub transferred_at: String,
}

pub struct SqliteRecorder {
    conn: Mutex<Connection>,
}

impl SqliteRecorder {
    /// Open (or create) the database file, creating parent folders as needed
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_entry(row: &Row) -> rusqlite::Result<HistoryEntry> {
        Ok(HistoryEntry {
            origin: row.get(0)?,
            mode: row.get(1)?,
            source_path: row.get(2)?,
            file_name: row.get(3)?,
            dest_root: row.get(4)?,
            media_type: row.get(5)?,
            category: row.get(6)?,
            title: row.get(7)?,
            year: row.get(8)?,
            season_episode: row.get(9)?,
            transferred_at: row.get(10)?,
        })
    }

    /// Newest first
    pub fn recent_transfers(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT origin, mode, source_path, file_name, dest_root, media_type, category, title, year, season_episode, transferred_at
             FROM transfer_history ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| Self::row_to_entry(row))?;

        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }
        Ok(entries)
    }

    pub fn unknown_count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transfer_unknown", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl Recorder for SqliteRecorder {
    fn record_transfer(
        &self,
        origin: Origin,
        mode: TransferMode,
        src: &Path,
        dest_root: &Path,
        record: &MediaRecord,
    ) -> Result<()> {
        let file_name = src
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let season_episode = format!("{}{}", record.season_item(), record.episode_items());

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO transfer_history (origin, mode, source_path, file_name, dest_root, media_type, category, title, year, season_episode, transferred_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                origin.as_str(),
                mode.as_config_value(),
                src.to_string_lossy(),
                file_name,
                dest_root.to_string_lossy(),
                record.media_type.as_str(),
                record.category,
                record.title,
                record.year.map(|y| y.to_string()),
                Some(season_episode).filter(|s| !s.is_empty()),
                Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ],
        )?;
        Ok(())
    }

    fn record_unknown(&self, src: &Path, target_dir: Option<PathBuf>) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO transfer_unknown (path, target_dir, recorded_at) VALUES (?1, ?2, ?3)",
            params![
                src.to_string_lossy(),
                target_dir.map(|t| t.to_string_lossy().into_owned()),
                Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ],
        )?;
        Ok(())
    }
}
