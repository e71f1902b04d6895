// Command handlers module
pub mod completions;
pub mod config;
pub mod dest;
pub mod favorite;
pub mod history;
pub mod manual;
pub mod sync;
pub mod transfer;
pub mod version;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::{FilenameResolver, LogNotifier, SqliteRecorder};
use crate::core::{Config, EntryOutcome, TransferService};
use crate::ui;

// Re-exports for cleaner imports
pub use version::execute as version;

/// Wire the service with the default resolver, history database and notifier
pub fn build_service(config: Config) -> Result<(TransferService, Arc<SqliteRecorder>)> {
    let db_path = config.history_db_path()?;
    let recorder = Arc::new(
        SqliteRecorder::open(&db_path)
            .with_context(|| format!("Failed to open history database: {:?}", db_path))?,
    );
    let resolver = Arc::new(FilenameResolver::new(
        config.media.default_category.clone(),
    ));

    let service = TransferService::new(
        config,
        resolver,
        recorder.clone(),
        Arc::new(LogNotifier::new()),
    );
    Ok((service, recorder))
}

/// Print one line per entry; returns how many failed
pub(crate) fn report_outcomes(outcomes: &[EntryOutcome]) -> usize {
    let mut failures = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(summary) => println!(
                "{} {}",
                outcome.path.display(),
                ui::format_summary(summary)
            ),
            Err(e) => {
                failures += 1;
                ui::error(&format!("{} failed: {}", outcome.path.display(), e));
            }
        }
    }
    failures
}
