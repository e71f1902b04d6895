use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::adapters::SqliteRecorder;
use crate::core::Config;
use crate::ui;

/// Show the most recent transfers
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let limit = matches.get_one::<usize>("limit").copied().unwrap_or(20);

    let config = Config::load()?;
    let db_path = config.history_db_path()?;
    if !db_path.exists() {
        ui::dimmed("No transfers recorded yet");
        return Ok(());
    }

    let recorder = SqliteRecorder::open(&db_path)
        .with_context(|| format!("Failed to open history database: {:?}", db_path))?;
    let entries = recorder.recent_transfers(limit)?;

    if entries.is_empty() {
        ui::dimmed("No transfers recorded yet");
    }
    for entry in &entries {
        let title = match &entry.year {
            Some(year) => format!("{} ({})", entry.title, year),
            None => entry.title.clone(),
        };
        println!(
            "{}  {:<8} {} {}  {}",
            entry.transferred_at.dimmed(),
            entry.media_type,
            title.white().bold(),
            entry.season_episode.as_deref().unwrap_or(""),
            format!("{} via {}", entry.origin, entry.mode).dimmed()
        );
        println!("    {} -> {}", entry.file_name, entry.dest_root.cyan());
    }

    let unknown = recorder.unknown_count()?;
    if unknown > 0 {
        ui::warn(&format!("{} unidentified file(s) recorded", unknown));
    }
    Ok(())
}
