use super::console::{Console, Key, TextStyle};
use crate::core::error::Result;

// First screen row and column used for result lines
const TOP_ROW: u16 = 1;
const LEFT_COL: u16 = 2;
// Rows kept free around the viewport
const RESERVED_ROWS: usize = 2;

/// Navigation requests understood by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    Down,
    Up,
    PageDown,
    PageUp,
    Exit,
}

impl BrowseAction {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Down | Key::Char('j') => Some(BrowseAction::Down),
            Key::Up | Key::Char('k') => Some(BrowseAction::Up),
            Key::PageDown => Some(BrowseAction::PageDown),
            Key::PageUp => Some(BrowseAction::PageUp),
            Key::Enter | Key::Esc => Some(BrowseAction::Exit),
            _ => None,
        }
    }
}

/// Scroll offset into a block of rendered lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: usize,
}

impl ScrollState {
    /// Largest offset that still keeps the last line at the bottom of the viewport
    pub fn max_offset(total_lines: usize, viewport: usize) -> usize {
        total_lines.saturating_sub(viewport)
    }

    /// Apply an action. Returns `false` when the browser should close.
    pub fn apply(&mut self, action: BrowseAction, total_lines: usize, viewport: usize) -> bool {
        let max = Self::max_offset(total_lines, viewport);
        self.offset = match action {
            BrowseAction::Down => (self.offset + 1).min(max),
            BrowseAction::Up => self.offset.saturating_sub(1),
            BrowseAction::PageDown => (self.offset + viewport).min(max),
            BrowseAction::PageUp => self.offset.saturating_sub(viewport),
            BrowseAction::Exit => return false,
        };
        true
    }

    /// Pull the offset back in range, e.g. after the screen grew
    pub fn clamp(&mut self, total_lines: usize, viewport: usize) {
        self.offset = self.offset.min(Self::max_offset(total_lines, viewport));
    }

    /// Index range of the visible lines
    pub fn visible(&self, total_lines: usize, viewport: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(total_lines);
        start..(start + viewport).min(total_lines)
    }
}

/// Number of result lines that fit on a screen with `rows` rows
pub fn viewport_height(rows: u16) -> usize {
    (rows as usize).saturating_sub(RESERVED_ROWS).max(1)
}

/// Draw one page of `lines`. Lines that do not fit the screen are skipped.
pub fn draw_page<C: Console>(console: &mut C, lines: &[String], state: &ScrollState, viewport: usize) {
    console.clear();
    for (i, index) in state.visible(lines.len(), viewport).enumerate() {
        let row = TOP_ROW.saturating_add(i as u16);
        if let Err(e) = console.draw(row, LEFT_COL, &lines[index], TextStyle::Normal) {
            tracing::trace!(line = index, error = %e, "skipped result line");
        }
    }
}

/// Let the user scroll through `lines` until Enter or Esc
pub fn browse<C: Console>(console: &mut C, lines: &[String]) -> Result<()> {
    let mut state = ScrollState::default();

    loop {
        let (rows, _) = console.size()?;
        let viewport = viewport_height(rows);
        state.clamp(lines.len(), viewport);

        draw_page(console, lines, &state, viewport);
        console.present()?;

        if let Some(action) = BrowseAction::from_key(console.read_key()?) {
            if !state.apply(action, lines.len(), viewport) {
                return Ok(());
            }
        }
    }
}
