use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::Path;

use super::build_service;
use crate::core::Config;
use crate::ui;

/// Move a movie folder into the favorites folder
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<String>("path")
        .context("Path argument is required")?;

    let (service, _) = build_service(Config::load()?)?;
    match service.transfer_favorite(Path::new(path))? {
        Some(category) => ui::success(&format!(
            "✓ Moved {} to {} (was in {})",
            path,
            service.config().media.favorite_dir,
            category
        )),
        None => ui::dimmed(&format!("{} was not moved", path)),
    }
    Ok(())
}
