use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::app::{SketchConfig, run_sketch};
use engine::surface::Surface;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tictactoe::board::OutOfGridPolicy;
use tictactoe::session::parse_clicks;
use tictactoe::settings::{BoardSettings, SettingsStore};
use tictactoe::sketch::BoardSketch;
use tictactoe::snapshot::{render_clicks, write_png};

#[derive(Debug, Parser)]
#[command(name = "tictactoe")]
#[command(about = "Click to place alternating X and O marks on a 3x3 grid")]
struct Cli {
    /// Settings file (defaults to $TICTACTOE_SETTINGS_PATH or the user config dir).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Overrides what happens to clicks that land outside the grid.
    #[arg(long, value_enum, global = true)]
    out_of_grid: Option<OutOfGridPolicy>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open the board window (the default).
    Run,
    /// Replay clicks headlessly and write the resulting canvas as PNG.
    Snapshot {
        /// Click positions in canvas pixels, e.g. "150,150 20,20 250,40".
        #[arg(long, default_value = "")]
        clicks: String,
        #[arg(long, default_value = "board.png")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cmd_run(&settings),
        Commands::Snapshot { clicks, out } => cmd_snapshot(&settings, &clicks, out),
    }
}

fn load_settings(cli: &Cli) -> BoardSettings {
    let store = match &cli.settings {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::from_env(),
    };
    info!(path = %store.path().display(), "loading settings");

    let mut settings = store.load();
    if let Some(policy) = cli.out_of_grid {
        settings.input.out_of_grid = policy;
    }
    settings
}

fn cmd_run(settings: &BoardSettings) -> Result<()> {
    let mut config = SketchConfig::new(settings.canvas.title.clone(), settings.canvas_size());
    config.vsync = settings.canvas.vsync;

    run_sketch(config, BoardSketch::from_settings(settings))
        .context("board window failed")
}

fn cmd_snapshot(settings: &BoardSettings, clicks: &str, out: PathBuf) -> Result<()> {
    let clicks = parse_clicks(clicks).context("invalid --clicks")?;
    let surface = render_clicks(settings, &clicks);
    let size = surface.size();

    write_png(&out, size.width, size.height, surface.frame())
        .with_context(|| format!("failed to write {}", out.display()))?;
    info!(clicks = clicks.len(), out = %out.display(), "snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::EngineError;

    #[test]
    fn window_errors_keep_their_source_chain() {
        let source = EngineError::from(pixels::TextureError::TextureWidth(0));
        let failed: Result<()> = Err::<(), _>(source).context("board window failed");
        let err = failed.expect_err("context wraps the error");

        assert_eq!(err.to_string(), "board window failed");
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::Texture(_))
        ));
        assert!(err.chain().count() >= 2);
    }
}
