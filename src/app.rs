//! Run loop: draw a frame, read a command, feed the session, advance time.

use std::io::{BufRead, Write};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::config::SessionConfig;
use crate::domain::{BoardState, ChessBoard, Side};
use crate::models::engine::{MoveSource, UciEngine};
use crate::models::session::{InputEvent, Session};
use crate::ui::display::snapshot;
use crate::ui::terminal::{self, Command};

/// Start the engine from `config` and play one game on stdin/stdout.
#[instrument(skip(config), fields(engine = %config.engine.path))]
pub fn run(config: &SessionConfig, side: Option<Side>, color: bool) -> Result<()> {
    let engine = UciEngine::spawn(
        &config.engine.path,
        &config.engine.args,
        &config.engine.uci_options(),
    )
    .with_context(|| format!("Could not start engine '{}'", config.engine.path))?;
    info!(name = engine.name().unwrap_or("unknown"), "Engine ready");

    let session = Session::new(ChessBoard::new(), engine, config);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    play(session, side, stdin.lock(), stdout.lock(), color)
}

/// Drive `session` from `input` until the game closes, the human quits, or
/// input ends. The move source is released on every path.
pub fn play<B, S, R, W>(
    mut session: Session<B, S>,
    side: Option<Side>,
    mut input: R,
    mut output: W,
    color: bool,
) -> Result<()>
where
    B: BoardState,
    S: MoveSource,
    R: BufRead,
    W: Write,
{
    if let Some(side) = side {
        session.handle(InputEvent::SideChosen(side))?;
    }

    let mut line = String::new();
    while session.is_running() {
        write!(output, "{}", terminal::render(&snapshot(&session), color))?;

        if session.outcome().is_some() {
            output.flush()?;
            thread::sleep(session.close_delay());
            session.tick(Instant::now());
            break;
        }

        write!(output, "> ")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("Input closed");
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "{}\n{}", e, terminal::HELP)?;
                continue;
            }
        };
        if command == Command::Quit {
            info!("Human quit");
            break;
        }
        let Some(event) = command.into_event(session.layout(), session.human_side()) else {
            writeln!(output, "{}", terminal::HELP)?;
            continue;
        };

        if let Err(e) = session.handle(event) {
            warn!(error = %e, "Session ended by error");
            return Err(e).context("Game aborted");
        }
    }

    session.close();
    Ok(())
}
