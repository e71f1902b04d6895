use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::path::Path;

use crate::core::path_resolver::resolve_destination_path;
use crate::core::{Config, MediaType};

/// Print the library folder a title would be placed in
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let root = matches
        .get_one::<String>("root")
        .context("Root argument is required")?;
    let type_name = matches
        .get_one::<String>("type")
        .context("Type argument is required")?;
    let media_type = MediaType::parse(type_name)
        .with_context(|| format!("Unknown media type '{}' (movie, tv, anime)", type_name))?;
    let title = matches
        .get_one::<String>("title")
        .context("Title argument is required")?;
    let year = matches.get_one::<u32>("year").copied();
    let category = matches.get_one::<String>("category").map(String::as_str);
    let season = matches.get_one::<String>("season").map(String::as_str);

    let config = Config::load()?;
    let path = resolve_destination_path(
        &config.media,
        Path::new(root),
        media_type,
        title,
        year,
        category,
        season,
    )
    .context("Cannot build a destination path from these values")?;

    println!("{}", path.display().to_string().cyan().bold());
    Ok(())
}
