//! Search-engine capability and the UCI subprocess that provides it.
//!
//! The engine process is spawned once when the session starts and talked
//! to synchronously: a `best_move` call writes the position, then blocks
//! reading stdout until the engine answers with `bestmove`. The process is
//! shut down by [`MoveSource::close`] or, failing that, on drop.

use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, trace, warn};

use crate::domain::uci::{SearchLimit, UciCommand, UciOutputKind, best_move_token};
use crate::domain::{BoardState, Move};
use crate::error::EngineError;

/// How long an engine may take to exit after `quit`
pub const QUIT_GRACE: Duration = Duration::from_millis(500);

/// Produces the opponent's moves.
pub trait MoveSource {
    /// Pick a move for the side to move in `board`. Blocks until the source
    /// answers; an error means the source cannot continue the game.
    fn best_move<B: BoardState>(
        &mut self,
        board: &B,
        limit: SearchLimit,
    ) -> Result<Move, EngineError>;

    /// Release whatever the source holds. Called once at session end.
    fn close(&mut self) {}
}

/// A UCI engine running as a child process
pub struct UciEngine {
    /// Handle to the engine process
    process: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<BufReader<ChildStdout>>,
    /// Name reported via `id name`
    name: Option<String>,
}

impl UciEngine {
    /// Spawn `path` and run the UCI handshake, applying `options` with
    /// `setoption` before the first `isready`.
    #[instrument(skip(args, options))]
    pub fn spawn(
        path: &str,
        args: &[String],
        options: &BTreeMap<String, String>,
    ) -> Result<Self, EngineError> {
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| EngineError::new(format!("Failed to start engine '{}': {}", path, e)))?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take().map(BufReader::new);
        let mut engine = Self {
            process: Some(child),
            stdin,
            stdout,
            name: None,
        };
        if engine.stdin.is_none() || engine.stdout.is_none() {
            return Err(EngineError::new("Failed to open engine pipes"));
        }

        engine.send_command(UciCommand::Uci)?;
        loop {
            match engine.read_output()? {
                UciOutputKind::UciOk => break,
                UciOutputKind::Id(id) => {
                    if let Some(name) = id.strip_prefix("name ") {
                        engine.name = Some(name.to_string());
                    }
                }
                other => trace!(?other, "Handshake output"),
            }
        }

        for (name, value) in options {
            engine.send_command(UciCommand::SetOption {
                name: name.clone(),
                value: value.clone(),
            })?;
        }
        engine.send_command(UciCommand::UciNewGame)?;
        engine.wait_ready()?;

        info!(name = engine.name().unwrap_or("unknown"), "Engine started");
        Ok(engine)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }

    fn wait_ready(&mut self) -> Result<(), EngineError> {
        self.send_command(UciCommand::IsReady)?;
        loop {
            if self.read_output()? == UciOutputKind::ReadyOk {
                return Ok(());
            }
        }
    }

    /// Send a UCI command to the engine
    fn send_command(&mut self, cmd: UciCommand) -> Result<(), EngineError> {
        let line = cmd.to_string();
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| EngineError::new("Engine is not running"))?;
        trace!(%line, "-> engine");
        writeln!(stdin, "{}", line)?;
        stdin.flush()?;
        Ok(())
    }

    /// Read and classify the next output line, blocking until one arrives
    fn read_output(&mut self) -> Result<UciOutputKind, EngineError> {
        let stdout = self
            .stdout
            .as_mut()
            .ok_or_else(|| EngineError::new("Engine is not running"))?;
        let mut line = String::new();
        if stdout.read_line(&mut line)? == 0 {
            return Err(EngineError::new("Engine exited unexpectedly"));
        }
        trace!(line = line.trim_end(), "<- engine");
        Ok(UciOutputKind::parse(&line))
    }
}

impl MoveSource for UciEngine {
    #[instrument(skip(self, board))]
    fn best_move<B: BoardState>(
        &mut self,
        board: &B,
        limit: SearchLimit,
    ) -> Result<Move, EngineError> {
        self.send_command(UciCommand::position(&board.position_record()))?;
        self.send_command(UciCommand::Go(limit))?;
        loop {
            match self.read_output()? {
                UciOutputKind::BestMove(payload) => {
                    let token = best_move_token(&payload)
                        .ok_or_else(|| EngineError::new("Engine returned no move"))?;
                    let mv: Move = token.parse().map_err(|_| {
                        EngineError::new(format!("Engine returned unreadable move '{}'", token))
                    })?;
                    debug!(%mv, "Engine move");
                    return Ok(mv);
                }
                _ => {}
            }
        }
    }

    /// Ask the engine to quit, then reap it. Killed if it is still running
    /// after [`QUIT_GRACE`].
    fn close(&mut self) {
        let Some(mut child) = self.process.take() else {
            return;
        };
        if let Err(e) = self.send_command(UciCommand::Quit) {
            warn!(error = %e, "Could not send quit to engine");
        }
        self.stdin = None;
        self.stdout = None;

        match wait_for_exit(&mut child, QUIT_GRACE) {
            Ok(Some(status)) => info!(%status, "Engine stopped"),
            Ok(None) => {
                warn!("Engine ignored quit, killing it");
                if let Err(e) = child.kill() {
                    warn!(error = %e, "Could not kill engine");
                }
                match child.wait() {
                    Ok(status) => info!(%status, "Engine killed"),
                    Err(e) => warn!(error = %e, "Could not reap engine"),
                }
            }
            Err(e) => warn!(error = %e, "Could not reap engine"),
        }
    }
}

fn wait_for_exit(child: &mut Child, grace: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + grace;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(Duration::from_millis(10));
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::domain::ChessBoard;

    /// A tiny UCI engine: always answers `bestmove` with the first argument
    /// and, if given a second, writes to that file when told to quit
    const FAKE_ENGINE: &str = r#"
while read -r line; do
  case "$line" in
    uci) echo "id name Fake Engine"; echo "option name Skill Level type spin"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "info depth 1 score cp 12 pv $1"; echo "bestmove $1" ;;
    quit) [ -n "$2" ] && echo bye > "$2"; exit 0 ;;
  esac
done
"#;

    fn fake_engine(reply: &str) -> Result<UciEngine, EngineError> {
        let args = vec![
            "-c".to_string(),
            FAKE_ENGINE.to_string(),
            "fake".to_string(),
            reply.to_string(),
        ];
        UciEngine::spawn("sh", &args, &BTreeMap::new())
    }

    #[test]
    fn test_handshake_and_best_move() {
        let mut engine = fake_engine("e7e5").unwrap();
        assert_eq!(engine.name(), Some("Fake Engine"));
        let board = ChessBoard::new();
        let mv = engine.best_move(&board, SearchLimit::Depth(1)).unwrap();
        assert_eq!(mv, "e7e5".parse().unwrap());
        // the connection stays usable for the next request
        let again = engine.best_move(&board, SearchLimit::MoveTimeMs(10)).unwrap();
        assert_eq!(again, mv);
        engine.close();
        assert!(!engine.is_running());
    }

    #[test]
    fn test_no_move_is_an_error() {
        let mut engine = fake_engine("(none)").unwrap();
        let err = engine
            .best_move(&ChessBoard::new(), SearchLimit::Depth(1))
            .unwrap_err();
        assert!(err.message.contains("no move"));
    }

    #[test]
    fn test_closed_engine_refuses_requests() {
        let mut engine = fake_engine("e7e5").unwrap();
        engine.close();
        engine.close();
        assert!(engine
            .best_move(&ChessBoard::new(), SearchLimit::Depth(1))
            .is_err());
    }

    #[test]
    fn test_close_lets_engine_exit_on_quit() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("quit");
        let args = vec![
            "-c".to_string(),
            FAKE_ENGINE.to_string(),
            "fake".to_string(),
            "e7e5".to_string(),
            marker.display().to_string(),
        ];
        let mut engine = UciEngine::spawn("sh", &args, &BTreeMap::new()).unwrap();
        engine.close();
        assert!(!engine.is_running());
        assert_eq!(std::fs::read_to_string(&marker).unwrap().trim(), "bye");
    }

    #[test]
    fn test_engine_ignoring_quit_is_killed() {
        let script = r#"
while read -r line; do
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
  esac
done
sleep 30
"#;
        let args = vec!["-c".to_string(), script.to_string()];
        let mut engine = UciEngine::spawn("sh", &args, &BTreeMap::new()).unwrap();
        let started = Instant::now();
        engine.close();
        assert!(!engine.is_running());
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_missing_binary_fails_to_start() {
        let result = UciEngine::spawn("/nonexistent/stockfish", &[], &BTreeMap::new());
        assert!(result.is_err());
    }
}
