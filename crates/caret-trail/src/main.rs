use std::path::PathBuf;

use anyhow::Result;
use caret_trail_config::TrailConfig;
use clap::Parser;

mod logging;
mod script;

/// Replays an editor script with soft undo/redo of cursor history.
#[derive(Parser, Debug)]
#[command(name = "caret-trail", version, about)]
struct Cli {
    /// Script to replay. Reads stdin when omitted.
    script: Option<PathBuf>,

    /// Configuration file (defaults to `caret-trail.json` next to the binary).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the history capacity from the configuration.
    #[arg(long)]
    capacity: Option<usize>,

    /// Print selections and history as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging goes first so config load warnings are visible; stdout is
    // reserved for script output
    let log_filter = logging::init();

    let config_path = cli.config.clone().unwrap_or_else(TrailConfig::config_path);
    let mut config = TrailConfig::load_or_create(&config_path);
    if let Some(capacity) = cli.capacity {
        config.history_capacity = capacity;
        config.sanitize();
    }
    log_filter.apply_config(&config);

    tracing::info!(
        config = %config_path.display(),
        capacity = config.history_capacity,
        "Starting caret-trail"
    );

    let source = script::read_source(cli.script.as_deref())?;
    let session = script::Session::new(&config, cli.json);
    let stdout = std::io::stdout();
    session.run_script(&source, &mut stdout.lock())?;

    if let Some(id) = session.surface().document_id() {
        tracing::debug!(%id, "Script finished");
    }
    Ok(())
}
