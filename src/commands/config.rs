use crate::core::Config;
use anyhow::{Context, Result};
use colored::Colorize;

pub fn handle_config(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("path", _)) => show_path(),
        Some(("show", _)) => show_config(),
        Some(("init", sub_matches)) => init_config(sub_matches.get_flag("force")),
        _ => {
            println!("Use 'rmt config --help' for more information.");
            Ok(())
        }
    }
}

fn show_path() -> Result<()> {
    let config_path = Config::get_config_path()?;
    println!("{}", "Config file:".white());
    println!("{}", config_path.display().to_string().cyan().bold());
    if !config_path.exists() {
        println!("{}", "(not created yet, defaults are in use)".dimmed());
    }
    Ok(())
}

fn show_config() -> Result<()> {
    let config = Config::load()?;
    let content =
        serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{}", content);

    for (label, root) in [
        ("movie", &config.media.movie_path),
        ("tv", &config.media.tv_path),
        ("anime", &config.media.anime_path),
        ("unknown", &config.media.unknown_path),
    ] {
        if root.as_deref().map_or(true, |r| r.trim().is_empty()) {
            println!("{}", format!("⚠️  No {} library root configured", label).yellow());
        }
    }
    Ok(())
}

/// Write a template with every default spelled out
fn init_config(force: bool) -> Result<()> {
    let config_path = Config::get_config_path()?;
    if config_path.exists() && !force {
        println!(
            "{}",
            format!("⚠️  {} already exists", config_path.display()).yellow()
        );
        println!("{}", "Use --force to overwrite it.".dimmed());
        return Ok(());
    }

    Config::default().save_to(&config_path)?;
    println!(
        "{} {}",
        "✓ Config template written to:".green(),
        config_path.display()
    );
    Ok(())
}
