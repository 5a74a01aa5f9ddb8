//! Append-only move history with a clamped scroll position.

use std::fmt;

/// Who played a half-move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Actor {
    Human,
    Opponent,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Human => f.write_str("Human"),
            Actor::Opponent => f.write_str("Computer"),
        }
    }
}

/// One logged half-move. Never edited after it is appended.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MoveLogEntry {
    sequence: usize,
    actor: Actor,
    text: String,
}

impl MoveLogEntry {
    /// 1-based half-move number
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub fn actor(&self) -> Actor {
        self.actor
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for MoveLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} ({})", self.sequence, self.text, self.actor)
    }
}

/// The move history panel: entries laid out top to bottom, `line_height`
/// pixels each, seen through a `viewport_height` window scrolled by
/// `offset` pixels.
#[derive(Clone, Debug)]
pub struct MoveLog {
    entries: Vec<MoveLogEntry>,
    line_height: u32,
    viewport_height: u32,
    offset: u32,
}

impl MoveLog {
    pub fn new(line_height: u32, viewport_height: u32) -> Self {
        Self {
            entries: Vec::new(),
            line_height: line_height.max(1),
            viewport_height,
            offset: 0,
        }
    }

    pub fn append(&mut self, actor: Actor, text: impl Into<String>) -> &MoveLogEntry {
        // follow the tail if the view was already at the bottom
        let pinned = self.offset == self.max_offset();
        self.entries.push(MoveLogEntry {
            sequence: self.entries.len() + 1,
            actor,
            text: text.into(),
        });
        if pinned {
            self.offset = self.max_offset();
        }
        self.clamp();
        &self.entries[self.entries.len() - 1]
    }

    /// Move the view by `delta` pixels; positive scrolls toward newer entries.
    pub fn scroll_by(&mut self, delta: i64) {
        let target = i64::from(self.offset).saturating_add(delta);
        self.offset = target.clamp(0, i64::from(self.max_offset())) as u32;
    }

    /// Entries intersecting a `viewport_height` window at the current offset,
    /// each with its y position relative to the top of the window (the
    /// first one may start above it).
    pub fn visible_entries(
        &self,
        viewport_height: u32,
    ) -> impl Iterator<Item = (i64, &MoveLogEntry)> + Clone + '_ {
        let line = u64::from(self.line_height);
        let offset = u64::from(self.offset);
        let first = (offset / line) as usize;
        let end = (offset + u64::from(viewport_height)).div_ceil(line) as usize;
        self.entries
            .iter()
            .enumerate()
            .skip(first)
            .take(end.saturating_sub(first))
            .map(move |(index, entry)| (index as i64 * line as i64 - offset as i64, entry))
    }

    pub fn entries(&self) -> &[MoveLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&MoveLogEntry> {
        self.entries.last()
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    pub fn total_height(&self) -> u64 {
        self.entries.len() as u64 * u64::from(self.line_height)
    }

    pub fn max_offset(&self) -> u32 {
        self.total_height()
            .saturating_sub(u64::from(self.viewport_height))
            .min(u64::from(u32::MAX)) as u32
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_with(n: usize, line: u32, viewport: u32) -> MoveLog {
        let mut log = MoveLog::new(line, viewport);
        for i in 0..n {
            let actor = if i % 2 == 0 { Actor::Human } else { Actor::Opponent };
            log.append(actor, format!("m{}", i + 1));
        }
        log
    }

    #[test]
    fn test_append_numbers_entries() {
        let mut log = MoveLog::new(30, 800);
        assert!(log.is_empty());
        let first = log.append(Actor::Human, "e4").clone();
        assert_eq!(first.sequence(), 1);
        log.append(Actor::Opponent, "e5");
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[1].sequence(), 2);
        assert_eq!(log.entries()[1].actor(), Actor::Opponent);
        assert_eq!(log.entries()[0].to_string(), "1. e4 (Human)");
        assert_eq!(log.entries()[1].to_string(), "2. e5 (Computer)");
    }

    #[test]
    fn test_short_log_never_scrolls() {
        let mut log = log_with(5, 30, 800);
        assert_eq!(log.max_offset(), 0);
        log.scroll_by(500);
        assert_eq!(log.offset(), 0);
        log.scroll_by(-500);
        assert_eq!(log.offset(), 0);
    }

    #[test]
    fn test_scroll_clamps_both_ends() {
        // 40 lines * 30px = 1200px in an 800px viewport
        let mut log = log_with(40, 30, 800);
        assert_eq!(log.max_offset(), 400);
        log.scroll_by(-30);
        assert_eq!(log.offset(), 370);
        log.scroll_by(10_000);
        assert_eq!(log.offset(), 400);
        log.scroll_by(i64::MIN);
        assert_eq!(log.offset(), 0);
        log.scroll_by(i64::MAX);
        assert_eq!(log.offset(), 400);
    }

    #[test]
    fn test_scroll_invariant_over_sequences() {
        let deltas = [-90, 45, 1000, -3, -7000, 30, 30, 30, 12, -1];
        for (n, viewport) in [(0, 0), (1, 0), (10, 300), (27, 800), (100, 50)] {
            let mut log = log_with(n, 30, viewport);
            for delta in deltas {
                log.scroll_by(delta);
                let max = log.total_height().saturating_sub(u64::from(viewport));
                assert!(u64::from(log.offset()) <= max);
            }
        }
    }

    #[test]
    fn test_append_follows_tail_when_pinned() {
        let mut log = log_with(40, 30, 800);
        assert_eq!(log.offset(), 400);
        log.append(Actor::Human, "x");
        assert_eq!(log.offset(), 430);

        log.scroll_by(-100);
        log.append(Actor::Opponent, "y");
        assert_eq!(log.offset(), 330);
    }

    #[test]
    fn test_visible_entries_window() {
        let mut log = log_with(40, 30, 300);
        log.scroll_by(-10_000);
        let visible: Vec<_> = log.visible_entries(300).collect();
        assert_eq!(visible.len(), 10);
        assert_eq!(visible[0].0, 0);
        assert_eq!(visible[0].1.sequence(), 1);

        // half a line scrolled: partial lines at both edges
        log.scroll_by(45);
        let visible: Vec<_> = log.visible_entries(300).collect();
        assert_eq!(visible.first().map(|(y, e)| (*y, e.sequence())), Some((-15, 2)));
        assert_eq!(visible.last().map(|(_, e)| e.sequence()), Some(12));
    }

    #[test]
    fn test_visible_entries_is_restartable() {
        let log = log_with(12, 30, 100);
        let view = log.visible_entries(100);
        let first: Vec<_> = view.clone().map(|(_, e)| e.sequence()).collect();
        let second: Vec<_> = view.map(|(_, e)| e.sequence()).collect();
        assert_eq!(first, second);
        assert_eq!(log.offset(), log.max_offset());
    }
}
