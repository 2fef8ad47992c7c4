//! `fplan config`: check an engine config file before using it.

use std::path::PathBuf;

use clap::Subcommand;

use crate::inputs::{default_config_path, load_config};
use crate::CliError;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Parse and validate a config without running anything
    #[command(after_help = "\
Examples:
  fplan config validate fieldplan.toml
  fplan config validate ~/.config/fieldplan/config.toml")]
    Validate {
        /// Path to the config TOML
        config: PathBuf,
    },

    /// Print where the per-user config file is looked up
    Path,
}

pub fn cmd_config(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Validate { config } => {
            let parsed = load_config(&config)?;
            eprintln!(
                "config ok: max_stops={}, default_city={}",
                parsed.planner.max_stops, parsed.geo.default_city
            );
            Ok(())
        }
        ConfigCommands::Path => match default_config_path() {
            Some(path) => {
                println!("{}", path.display());
                Ok(())
            }
            None => Err(CliError::general("no config directory on this platform")),
        },
    }
}
