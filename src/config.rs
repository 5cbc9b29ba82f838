//! Startup configuration.
//!
//! Every setting can come from a command line flag or an `ONTHISDAY_*`
//! environment variable; a `.env` file in the working directory is loaded
//! first.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::date::{self, parse_date_input};
use crate::error::ConfigError;
use crate::source::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};

#[derive(Debug, Parser)]
#[command(name = "onthisday")]
#[command(about = "Births, deaths, events and holidays from Wikipedia for any calendar day")]
#[command(version)]
pub struct Cli {
    /// Date to open on, as YYYY-MM-DD (defaults to today)
    #[arg(short, long, env = "ONTHISDAY_DATE", value_parser = parse_date_input)]
    pub date: Option<NaiveDate>,

    /// Root of the Wikimedia REST API to query
    #[arg(long, env = "ONTHISDAY_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Value sent in the Api-User-Agent header
    #[arg(long, env = "ONTHISDAY_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Directory for log files (defaults to <cache dir>/onthisday/logs)
    #[arg(long, env = "ONTHISDAY_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level filter, overridden by RUST_LOG
    #[arg(long, env = "ONTHISDAY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub start_date: NaiveDate,
    pub endpoint: String,
    pub user_agent: String,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Load `.env`, parse the process arguments and resolve defaults.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let log_dir = match cli.log_dir {
            Some(dir) => dir,
            None => default_log_dir()?,
        };

        Ok(Self {
            start_date: cli.date.unwrap_or_else(date::today),
            endpoint: cli.endpoint,
            user_agent: cli.user_agent,
            log_dir,
            log_level: cli.log_level,
        })
    }
}

fn default_log_dir() -> Result<PathBuf, ConfigError> {
    dirs::cache_dir()
        .map(|dir| dir.join("onthisday").join("logs"))
        .ok_or(ConfigError::NoCacheDir)
}
