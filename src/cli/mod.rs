//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "heikin")]
#[command(author, version, about = "Heikin-Ashi market-signal bot")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate the watchlist on a cadence while the market is open
    Run(RunArgs),
    /// Evaluate one cycle now and print the report
    Once(OnceArgs),
    /// Show Heikin-Ashi bars, trend and signal from CSV history
    Signals(SignalsArgs),
    /// List strategy presets
    Strategies,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Log orders instead of submitting them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct OnceArgs {
    /// Log orders instead of submitting them
    #[arg(long)]
    pub dry_run: bool,

    /// Symbols to evaluate instead of the watchlist (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct SignalsArgs {
    /// Directory of <SYMBOL>.csv bar histories
    #[arg(long)]
    pub data: PathBuf,

    /// Symbols to analyze (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',', required = true)]
    pub symbols: Vec<String>,

    /// Strategy preset, overriding the configuration
    #[arg(short, long)]
    pub preset: Option<String>,

    /// RSI period for the momentum column
    #[arg(long, default_value_t = 14)]
    pub rsi_period: usize,

    /// Output format
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,
}
