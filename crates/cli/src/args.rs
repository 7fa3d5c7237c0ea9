//! Command line surface of the `rfeed` binary

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// rfeed: polls RSS/Atom feeds and delivers new, tag-matching items
#[derive(Parser, Debug)]
#[command(name = "rfeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "RFEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `rfeed_adapters=trace`; RUST_LOG wins when set
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the configured feeds and deliver new items
    Run(RunArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Log matching items without delivering or recording them
    #[arg(long)]
    pub dry_run: bool,

    /// Poll every feed once, then exit
    #[arg(long)]
    pub once: bool,

    /// Append items to a JSONL outbox for review instead of calling the webhook
    #[arg(long)]
    pub require_approval: bool,

    /// Outbox location for --require-approval [default: ./outbox.jsonl]
    #[arg(long, value_name = "PATH")]
    pub outbox: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a commented example configuration
    Init {
        /// Destination file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Replace the file if it already exists
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration after file and environment layering
    Show,
}
