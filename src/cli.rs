// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Build run status, end-to-end times and push counts",
    long_about = None
)]
pub struct Args {
    /// TOML file overriding the branch and reason pattern registries
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json, global = true)]
    pub format: Format,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// End-to-end times of every push on a branch
    EndToEnd {
        /// Build request rows, one JSON object per line
        #[arg(short, long)]
        input: PathBuf,

        /// Window start, unix seconds (default: one day before the end)
        #[arg(long)]
        start: Option<i64>,

        /// Window end, unix seconds (default: now)
        #[arg(long)]
        end: Option<i64>,

        /// Branch name (default from config, usually mozilla-central)
        #[arg(short, long)]
        branch: Option<String>,

        /// Leave out per-run details
        #[arg(long)]
        summary: bool,
    },

    /// Status of all build requests for one revision
    Run {
        #[arg(short, long)]
        input: PathBuf,

        /// Revision prefix; omit to select nightlies (no revision)
        #[arg(short, long)]
        revision: Option<String>,

        #[arg(short, long)]
        branch: Option<String>,

        /// Leave out the individual build requests
        #[arg(long)]
        summary: bool,
    },

    /// Push counts per interval, overall and per branch
    Pushes {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        start: Option<i64>,

        #[arg(long)]
        end: Option<i64>,

        /// Interval size in seconds; 0 for a single interval
        #[arg(long)]
        int_size: Option<i64>,

        /// Only count these branches (repeatable)
        #[arg(short, long)]
        branch: Vec<String>,
    },
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum Format {
    /// Pretty-printed JSON projection
    Json,
    /// Human readable summary
    Text,
}
