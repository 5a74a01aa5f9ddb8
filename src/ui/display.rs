//! Display generation for the board and move log.
//!
//! Transforms session state into view models. Depends on domain + models,
//! not vice versa.

use crate::domain::perspective::to_logical;
use crate::domain::BoardState;
use crate::models::engine::MoveSource;
use crate::models::session::{Phase, Session};
use crate::ui::view_models::{CellView, LogLineView, RenderSnapshot};

pub const CHOOSE_SIDE_PROMPT: &str = "Play as white or black?";

/// Build the view of the current frame.
pub fn snapshot<B: BoardState, S: MoveSource>(session: &Session<B, S>) -> RenderSnapshot {
    let Some(human) = session.human_side() else {
        return RenderSnapshot {
            phase: session.phase(),
            prompt: Some(CHOOSE_SIDE_PROMPT.to_string()),
            ..Default::default()
        };
    };

    let selected = session.state().selection.square();
    let targets = session.legal_targets();
    let board = session.board();

    let mut cells = Vec::with_capacity(64);
    for row in 0..8 {
        for col in 0..8 {
            let square = to_logical(col, row, human);
            cells.push(CellView {
                col,
                row,
                square,
                piece: board.piece_at(square),
                light: square.is_light(),
                selected: selected == Some(square),
                legal_target: targets.contains(&square),
            });
        }
    }

    let log = session.log();
    let log_lines = log
        .visible_entries(log.viewport_height())
        .map(|(y, entry)| LogLineView {
            y,
            sequence: entry.sequence(),
            actor: entry.actor(),
            text: entry.text().to_string(),
        })
        .collect();

    let banner = match session.phase() {
        Phase::Terminal(outcome) => outcome.banner(human),
        _ => None,
    };

    RenderSnapshot {
        phase: session.phase(),
        human: Some(human),
        cells,
        log_lines,
        prompt: None,
        banner,
    }
}
