//! PBS Dash CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use pbs_dash::export::{snapshot_to_markdown, snapshot_to_table};
use pbs_dash::ui::TUI;
use pbs_dash::{App, DashConfig, SnapshotSource};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pbs-dash", version, about = "PBS scheduler dashboard")]
struct Cli {
    /// Print the job table once instead of starting the dashboard
    #[arg(long)]
    inline: bool,

    /// With --inline, also write a Markdown report to PATH
    #[arg(long, value_name = "PATH", requires = "inline")]
    file: Option<PathBuf>,

    /// Seconds between dashboard refreshes (default: 30)
    #[arg(long, value_name = "SECONDS")]
    refresh_interval: Option<f64>,

    /// Scheduler snapshot file (.json, .yml or .yaml) instead of sample data
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Config file (default: <config dir>/pbs-dash/config.yml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = DashConfig::load(cli.config.as_deref())?
        .merge(cli.refresh_interval, cli.snapshot);
    config.validate()?;

    let source = SnapshotSource::from_option(config.snapshot.clone());
    log::debug!("Using snapshot source: {}", source.describe());

    if cli.inline {
        return run_inline(&source, cli.file).await;
    }

    log::info!("PBS Dash v{}", env!("CARGO_PKG_VERSION"));

    let mut app = App::new(source, config.refresh_interval());
    let mut tui = TUI::new()?;
    app.run(&mut tui).await
}

async fn run_inline(source: &SnapshotSource, file: Option<PathBuf>) -> Result<()> {
    let snapshot = source.fetch().await?;
    println!("{}", snapshot_to_table(&snapshot));

    if let Some(path) = file {
        std::fs::write(&path, snapshot_to_markdown(&snapshot) + "\n")
            .with_context(|| format!("Failed to write Markdown report to {}", path.display()))?;
        log::info!("Wrote Markdown report to {}", path.display());
    }

    for message in &snapshot.errors {
        eprintln!("{}", message);
    }
    Ok(())
}
