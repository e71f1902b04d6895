use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::PathBuf;

use super::build_service;
use crate::core::{Config, MediaType, Origin, TransferRequest};
use crate::ui;

/// Transfer one file or folder into the library
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<String>("path")
        .context("Path argument is required")?;

    let origin = match matches.get_one::<String>("origin") {
        Some(value) => Origin::parse(value)
            .with_context(|| format!("Unknown origin '{}' (downloader, monitor, manual)", value))?,
        None => Origin::Manual,
    };
    let media_type = matches
        .get_one::<String>("type")
        .map(|value| {
            MediaType::parse(value)
                .with_context(|| format!("Unknown media type '{}' (movie, tv, anime)", value))
        })
        .transpose()?;
    let target = matches.get_one::<String>("target").map(PathBuf::from);

    let (service, _) = build_service(Config::load()?)?;

    let mut request = TransferRequest::new(origin, path).with_target_dir(target);
    if let Some(media_type) = media_type {
        request = request.with_media_type(media_type);
    }

    let summary = service
        .transfer_media(&request)
        .with_context(|| format!("Transfer of {} failed", path))?;

    ui::success(&format!("✓ {} processed", path));
    println!("{}", ui::format_summary(&summary));
    Ok(())
}
