use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use std::path::Path;

use super::{build_service, report_outcomes};
use crate::core::{Config, Origin};
use crate::ui;

/// Transfer every first-level entry of a folder
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let source = matches
        .get_one::<String>("source")
        .context("Source argument is required")?;
    let target = matches.get_one::<String>("target").map(Path::new);

    let config = Config::load()?;
    ui::info(&format!(
        "Transferring everything in {} ({})",
        source,
        config.transfer_mode(Origin::Manual)
    ));

    let (service, _) = build_service(config)?;
    let outcomes = service.transfer_manually(Path::new(source), target)?;

    if outcomes.is_empty() {
        ui::warn(&format!("No media found in {}", source));
        return Ok(());
    }

    let failures = report_outcomes(&outcomes);
    if failures > 0 {
        bail!("{} of {} entries failed", failures, outcomes.len());
    }
    Ok(())
}
