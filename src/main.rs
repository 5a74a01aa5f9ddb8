mod cli;

use anyhow::Result;
use chess_session::SessionConfig;
use clap::Parser;
use cli::Cli;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the board
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::default(),
    };
    if let Some(engine) = cli.engine {
        config.engine.path = engine;
    }
    if let Some(depth) = cli.depth {
        config.engine.depth = depth;
        config.engine.movetime_ms = None;
    }

    info!(engine = %config.engine.path, "Starting chess session");
    chess_session::app::run(&config, cli.side, !cli.no_color)
}
