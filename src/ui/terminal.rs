//! Text front end: draws a [`RenderSnapshot`] and turns typed commands into
//! [`InputEvent`]s.

use std::str::FromStr;

use crossterm::style::{Color, Stylize};

use crate::domain::perspective::to_screen;
use crate::domain::{Actor, Side, Square};
use crate::models::session::InputEvent;
use crate::ui::board_layout::BoardLayout;
use crate::ui::theme;
use crate::ui::view_models::{CellView, RenderSnapshot};

pub const HELP: &str = "commands: white | black | <square> | click X Y | wheel N | quit";

/// A line typed by the human
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Side(Side),
    /// Click on the square, wherever it is drawn
    Square(Square),
    Click { x: f32, y: f32 },
    Wheel(i32),
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["quit" | "q" | "exit"] => Ok(Command::Quit),
            ["click", x, y] => match (x.parse(), y.parse()) {
                (Ok(x), Ok(y)) => Ok(Command::Click { x, y }),
                _ => Err(format!("bad coordinates in '{}'", line.trim())),
            },
            ["wheel", n] => n
                .parse()
                .map(Command::Wheel)
                .map_err(|_| format!("bad wheel delta '{}'", n)),
            [word] => {
                if let Ok(side) = word.parse::<Side>() {
                    Ok(Command::Side(side))
                } else if let Ok(square) = word.to_ascii_lowercase().parse::<Square>() {
                    Ok(Command::Square(square))
                } else {
                    Err(format!("unknown command '{}'", word))
                }
            }
            _ => Err(format!("unknown command '{}'", line.trim())),
        }
    }
}

impl Command {
    /// The input event this command stands for. Square commands need the
    /// human's side to find where the square is drawn.
    pub fn into_event(self, layout: &BoardLayout, human: Option<Side>) -> Option<InputEvent> {
        match self {
            Command::Side(side) => Some(InputEvent::SideChosen(side)),
            Command::Click { x, y } => Some(InputEvent::PointerDown { x, y }),
            Command::Square(square) => {
                let (col, row) = to_screen(square, human?);
                let (x, y) = layout.cell_center(col, row);
                Some(InputEvent::PointerDown { x, y })
            }
            Command::Wheel(delta_y) => Some(InputEvent::Wheel { delta_y }),
            Command::Quit => None,
        }
    }
}

/// Draw a frame as text. `color` styles cells and log lines with 24-bit
/// colors.
pub fn render(snapshot: &RenderSnapshot, color: bool) -> String {
    let mut out = String::new();

    if let Some(prompt) = &snapshot.prompt {
        push_line(&mut out, prompt, None);
    }

    if !snapshot.cells.is_empty() {
        for row in snapshot.cells.chunks(8) {
            let rank = row.first().map_or(0, |c| c.square.rank());
            out.push_str(&format!("{} ", rank + 1));
            for cell in row {
                out.push_str(&render_cell(cell, color));
            }
            out.push('\n');
        }
        out.push_str("  ");
        for cell in snapshot.cells.iter().take(8) {
            out.push_str(&format!(" {} ", (b'a' + cell.square.file()) as char));
        }
        out.push('\n');
    }

    for line in &snapshot.log_lines {
        let text = format!("{}. {} ({})", line.sequence, line.text, line.actor);
        let actor_color = match line.actor {
            Actor::Human => theme::HUMAN_MOVE,
            Actor::Opponent => theme::OPPONENT_MOVE,
        };
        push_line(&mut out, &text, color.then_some(actor_color));
    }

    if let Some(banner) = &snapshot.banner {
        push_line(&mut out, banner, color.then_some(theme::BANNER));
    }

    out
}

fn push_line(out: &mut String, text: &str, color: Option<Color>) {
    match color {
        Some(color) => out.push_str(&text.with(color).to_string()),
        None => out.push_str(text),
    }
    out.push('\n');
}

fn render_cell(cell: &CellView, color: bool) -> String {
    let symbol = match (cell.piece, cell.legal_target) {
        (Some(piece), _) => piece.symbol(),
        (None, true) => '*',
        (None, false) => '.',
    };
    if color {
        let background = if cell.selected {
            theme::SELECTED_SQUARE
        } else if cell.legal_target {
            theme::LEGAL_TARGET
        } else if cell.light {
            theme::LIGHT_SQUARE
        } else {
            theme::DARK_SQUARE
        };
        format!(" {} ", symbol)
            .with(theme::PIECE)
            .on(background)
            .to_string()
    } else if cell.selected {
        format!("[{}]", symbol)
    } else {
        format!(" {} ", symbol)
    }
}
