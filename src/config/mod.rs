pub mod toml_config;

pub use toml_config::TeamsFile;

#[cfg(feature = "cli")]
use crate::utils::{error::Result, validation::validate_non_empty_string, validation::Validate};
#[cfg(feature = "cli")]
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "volleyball-alerts")]
#[command(about = "Text your volleyball team before every match")]
pub struct CliConfig {
    #[arg(long, default_value = "teams.toml", help = "Team file to load")]
    pub config: PathBuf,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Alert every team playing on the given day (today by default)
    Notify {
        #[arg(long, help = "Run date as YYYY-MM-DD")]
        date: Option<NaiveDate>,

        #[arg(long, help = "Deliver through the configured mail endpoint instead of logging")]
        send: bool,

        #[arg(long, help = "Only message the contact with this name")]
        only_to: Option<String>,
    },
    /// List members booked into more than one game at the same time
    Conflicts,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Command::Notify {
            only_to: Some(name), ..
        } = &self.command
        {
            validate_non_empty_string("only_to", name)?;
        }
        Ok(())
    }
}
