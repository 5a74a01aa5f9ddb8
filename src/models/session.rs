//! Session controller - owns the board and session state and routes input.
//!
//! Phases run `ChoosingSide -> Playing -> Terminal`. All mutation happens
//! through [`Session::handle`] and [`Session::tick`] on a single thread; the
//! opponent's reply is computed inside `handle` before it returns.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, instrument};

use crate::config::SessionConfig;
use crate::domain::perspective::to_logical;
use crate::domain::uci::SearchLimit;
use crate::domain::{BoardState, MoveLog, Outcome, Selection, Side, Square};
use crate::error::{EngineError, SessionError};
use crate::models::engine::MoveSource;
use crate::models::turn::TurnCoordinator;
use crate::ui::BoardLayout;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Phase {
    #[default]
    ChoosingSide,
    Playing,
    Terminal(Outcome),
}

/// Input delivered by the presentation layer
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputEvent {
    SideChosen(Side),
    /// Primary button pressed at window coordinates
    PointerDown { x: f32, y: f32 },
    /// Wheel notches; positive scrolls up toward older moves
    Wheel { delta_y: i32 },
}

/// Everything the session mutates between events
#[derive(Clone, Debug)]
pub struct SessionState {
    pub chosen_side: Option<Side>,
    pub selection: Selection,
    pub log: MoveLog,
    pub phase: Phase,
    pub running: bool,
}

pub struct Session<B: BoardState, S: MoveSource> {
    board: B,
    state: SessionState,
    /// Move source waiting for the side to be chosen
    idle_source: Option<S>,
    turns: Option<TurnCoordinator<S>>,
    layout: BoardLayout,
    limit: SearchLimit,
    scroll_step: u32,
    close_delay: Duration,
    terminal_since: Option<Instant>,
}

impl<B: BoardState, S: MoveSource> Session<B, S> {
    /// Start a session on `board`. `source` is already connected and is
    /// held until the session closes.
    pub fn new(board: B, source: S, config: &SessionConfig) -> Self {
        Self {
            board,
            state: SessionState {
                chosen_side: None,
                selection: Selection::Idle,
                log: MoveLog::new(config.log.line_height, config.log.viewport_height),
                phase: Phase::ChoosingSide,
                running: true,
            },
            idle_source: Some(source),
            turns: None,
            layout: BoardLayout::from_config(&config.layout),
            limit: config.engine.search_limit(),
            scroll_step: config.log.scroll_step,
            close_delay: config.session.close_delay(),
            terminal_since: None,
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn log(&self) -> &MoveLog {
        &self.state.log
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn human_side(&self) -> Option<Side> {
        self.state.chosen_side
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// How long a finished game stays on screen
    pub fn close_delay(&self) -> Duration {
        self.close_delay
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state.phase {
            Phase::Terminal(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Destinations of the selected piece, for highlighting
    pub fn legal_targets(&self) -> Vec<Square> {
        self.state
            .selection
            .square()
            .map(|from| self.board.legal_destinations(from))
            .unwrap_or_default()
    }

    /// Feed one input event. An error is session-fatal: the move source
    /// has been released and the session no longer runs.
    #[instrument(skip(self), fields(phase = ?self.state.phase))]
    pub fn handle(&mut self, event: InputEvent) -> Result<(), SessionError> {
        if !self.state.running {
            debug!("Session closed, input ignored");
            return Ok(());
        }
        let result = match (self.state.phase, event) {
            (Phase::ChoosingSide, InputEvent::SideChosen(side)) => self.choose_side(side),
            (Phase::Playing, InputEvent::PointerDown { x, y }) => self.pointer_down(x, y),
            (Phase::Playing | Phase::Terminal(_), InputEvent::Wheel { delta_y }) => {
                self.scroll(delta_y);
                Ok(())
            }
            _ => {
                debug!("Input not accepted in this phase");
                Ok(())
            }
        };
        if let Err(e) = &result {
            error!(error = %e, "Session-fatal error");
            self.close();
        }
        result
    }

    /// Advance time. Closes the session once the result has been shown for
    /// the configured delay. Returns whether the session is still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(since) = self.terminal_since {
            if self.state.running && now.duration_since(since) >= self.close_delay {
                info!("Closing finished session");
                self.close();
            }
        }
        self.state.running
    }

    /// Release the move source and stop accepting input. Idempotent.
    pub fn close(&mut self) {
        if let Some(turns) = self.turns.as_mut() {
            turns.close();
        }
        if let Some(mut source) = self.idle_source.take() {
            source.close();
        }
        self.state.running = false;
    }

    fn choose_side(&mut self, side: Side) -> Result<(), SessionError> {
        info!(%side, "Human chose side");
        let source = self
            .idle_source
            .take()
            .ok_or_else(|| EngineError::new("No move source for this session"))?;
        self.state.chosen_side = Some(side);
        self.state.phase = Phase::Playing;
        let turns = self
            .turns
            .insert(TurnCoordinator::new(source, self.limit, side));
        let outcome = turns.open_game(&mut self.board, &mut self.state.log)?;
        self.after_turn(outcome);
        Ok(())
    }

    fn pointer_down(&mut self, x: f32, y: f32) -> Result<(), SessionError> {
        let Some(human) = self.state.chosen_side else {
            return Ok(());
        };
        if self.board.side_to_move() != human {
            return Ok(());
        }
        let Some((col, row)) = self.layout.pos_to_cell(x, y) else {
            return Ok(());
        };
        let square = to_logical(col, row, human);
        let (selection, committed) = self
            .state
            .selection
            .on_pointer_down(square, &self.board, human);
        self.state.selection = selection;

        let Some(mv) = committed else {
            return Ok(());
        };
        let turns = self
            .turns
            .as_mut()
            .ok_or_else(|| EngineError::new("No move source for this session"))?;
        let outcome = turns.play_human(&mut self.board, &mut self.state.log, mv)?;
        self.after_turn(outcome);
        Ok(())
    }

    fn scroll(&mut self, delta_y: i32) {
        let delta = -i64::from(delta_y) * i64::from(self.scroll_step);
        self.state.log.scroll_by(delta);
        debug!(offset = self.state.log.offset(), "Move log scrolled");
    }

    fn after_turn(&mut self, outcome: Outcome) {
        if outcome.is_terminal() {
            info!(%outcome, "Session reached a terminal position");
            self.state.phase = Phase::Terminal(outcome);
            self.state.selection = Selection::Idle;
            self.terminal_since = Some(Instant::now());
        }
    }
}
