use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

use rmt::commands;

fn build_cli() -> Command {
    Command::new("rmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Places downloaded media into a movie/TV/anime library")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(clap::ArgAction::SetTrue)
        )
        .subcommand(
            Command::new("transfer")
                .about("Transfer a file or folder into the library")
                .arg(
                    Arg::new("path")
                        .help("File or folder to transfer")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("target")
                        .short('t')
                        .long("target")
                        .value_name("DIR")
                        .help("Place everything under this folder instead of the library roots")
                )
                .arg(
                    Arg::new("origin")
                        .short('o')
                        .long("origin")
                        .value_name("ORIGIN")
                        .help("Where the request comes from: downloader, monitor or manual (default: manual)")
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_name("TYPE")
                        .help("Force the media type: movie, tv or anime")
                )
        )
        .subcommand(
            Command::new("manual")
                .about("Transfer every entry of a folder")
                .arg(
                    Arg::new("source")
                        .help("Folder whose entries are transferred")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("target")
                        .short('t')
                        .long("target")
                        .value_name("DIR")
                        .help("Place everything under this folder instead of the library roots")
                )
        )
        .subcommand(
            Command::new("sync")
                .about("Transfer everything in the configured sync folders")
        )
        .subcommand(
            Command::new("favorite")
                .about("Move a movie folder into the favorites folder")
                .arg(
                    Arg::new("path")
                        .help("Movie file or folder inside the movie library")
                        .required(true)
                        .index(1)
                )
        )
        .subcommand(
            Command::new("dest")
                .about("Print the library folder a title would be placed in")
                .arg(
                    Arg::new("root")
                        .long("root")
                        .value_name("DIR")
                        .help("Library root")
                        .required(true)
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_name("TYPE")
                        .help("movie, tv or anime")
                        .required(true)
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .value_name("TITLE")
                        .required(true)
                )
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_name("YEAR")
                        .value_parser(clap::value_parser!(u32))
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_name("CATEGORY")
                )
                .arg(
                    Arg::new("season")
                        .long("season")
                        .value_name("SEASON")
                        .help("Season label such as S01")
                )
        )
        .subcommand(
            Command::new("history")
                .about("Show recent transfers")
                .arg(
                    Arg::new("limit")
                        .short('n')
                        .long("limit")
                        .value_name("N")
                        .help("Number of entries to show (default: 20)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("20")
                )
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or create the configuration file (use 'rmt config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("path")
                        .about("Show the config file location")
                )
                .subcommand(
                    Command::new("show")
                        .about("Print the effective configuration")
                )
                .subcommand(
                    Command::new("init")
                        .about("Write a config template")
                        .arg(
                            Arg::new("force")
                                .short('f')
                                .long("force")
                                .help("Overwrite an existing file")
                                .action(clap::ArgAction::SetTrue)
                        )
                )
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("bash, zsh, fish, powershell or elvish")
                        .required(true)
                        .index(1)
                )
        )
        .subcommand(
            Command::new("version")
                .about("Shows version information")
        )
}

fn main() -> Result<()> {
    rmt::init_logging();

    let matches = build_cli().get_matches();

    if matches.get_flag("version") {
        return commands::version();
    }

    dispatch(&matches)
}

fn dispatch(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("transfer", sub_matches)) => commands::transfer::execute(sub_matches),
        Some(("manual", sub_matches)) => commands::manual::execute(sub_matches),
        Some(("sync", _)) => commands::sync::execute(),
        Some(("favorite", sub_matches)) => commands::favorite::execute(sub_matches),
        Some(("dest", sub_matches)) => commands::dest::execute(sub_matches),
        Some(("history", sub_matches)) => commands::history::execute(sub_matches),
        Some(("config", sub_matches)) => commands::config::handle_config(sub_matches),
        Some(("completions", sub_matches)) => {
            let mut cli = build_cli();
            commands::completions::execute(sub_matches, &mut cli)
        }
        Some(("version", _)) => commands::version(),
        _ => {
            println!("Welcome to rmt!");
            println!("Use 'rmt --help' for more information.");
            Ok(())
        }
    }
}
