// src/main.rs

use anyhow::Context;
use buildstats::cli::{Args, Command, Format};
use buildstats::config::{self, Registry};
use buildstats::window::TimeWindow;
use buildstats::{query, render, source};
use clap::Parser;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let start_time = Instant::now();

    if let Some(path) = &args.config {
        let registry = Registry::load_from(path)
            .with_context(|| format!("load config {}", path.display()))?;
        config::install(registry);
    }
    let defaults = &config::registry().defaults;

    let output = match args.command {
        Command::EndToEnd { input, start, end, branch, summary } => {
            let rows = source::read_rows(&input).context("read build request rows")?;
            let window = TimeWindow::resolve_now(start, end);
            let branch = branch.unwrap_or_else(|| defaults.branch.clone());
            let report = query::get_end_to_end_times(rows, window, &branch);
            match args.format {
                Format::Json => serde_json::to_string_pretty(&report.to_json(summary))?,
                Format::Text => render::end_to_end_text(&report, summary),
            }
        }
        Command::Run { input, revision, branch, summary } => {
            let rows = source::read_rows(&input).context("read build request rows")?;
            let run = query::get_build_run(rows, revision.as_deref(), branch.as_deref());
            match args.format {
                Format::Json => serde_json::to_string_pretty(&run.to_json(summary))?,
                Format::Text => render::build_run_text(&run, summary),
            }
        }
        Command::Pushes { input, start, end, int_size, branch } => {
            let rows = source::read_rows(&input).context("read build request rows")?;
            let window = TimeWindow::resolve_now(start, end);
            let int_size = int_size.unwrap_or(defaults.int_size);
            let report = query::get_pushes(&rows, window, int_size, &branch);
            match args.format {
                Format::Json => serde_json::to_string_pretty(&report.to_json())?,
                Format::Text => render::pushes_text(&report),
            }
        }
    };

    println!("{}", output.trim_end());
    info!("done in {:.2?}", start_time.elapsed());
    Ok(())
}
