use anyhow::Result;

use super::{build_service, report_outcomes};
use crate::core::Config;
use crate::ui;

/// Run every configured sync root once
pub fn execute() -> Result<()> {
    let config = Config::load()?;
    if config.sync.roots().is_empty() {
        ui::warn("No sync paths configured");
        ui::dimmed("Add entries like \"/downloads\" or \"/downloads|/library\" to sync.paths");
        return Ok(());
    }

    let (service, _) = build_service(config)?;
    let outcomes = service.transfer_all_sync();
    let failures = report_outcomes(&outcomes);

    if failures == 0 {
        ui::success(&format!("✓ {} entries synced", outcomes.len()));
    } else {
        ui::warn(&format!("{} of {} entries failed", failures, outcomes.len()));
    }
    Ok(())
}
