//! Command-line interface for chess-session.

use std::path::PathBuf;

use clap::Parser;

use chess_session::domain::Side;

/// Play chess against a UCI engine in the terminal
#[derive(Parser, Debug)]
#[command(name = "chess-session")]
#[command(about = "Play chess against a UCI engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML config file. Missing sections keep their defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Engine executable, overrides the config file
    #[arg(short, long)]
    pub engine: Option<String>,

    /// Search depth per move, overrides the config file
    #[arg(short, long)]
    pub depth: Option<u32>,

    /// Play this side without being asked
    #[arg(short, long)]
    pub side: Option<Side>,

    /// Plain text board without ANSI colors
    #[arg(long)]
    pub no_color: bool,
}
