//! Minimal terminal capability used by the menu and the result browser.
//!
//! Screens are drawn by queueing text cells between [`Console::clear`] and
//! [`Console::present`]; input arrives one [`Key`] at a time.

use crate::core::error::{Error, Result};
use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use std::io::{self, Stdout};

/// Keys the application reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    PageUp,
    PageDown,
    Enter,
    Esc,
    Backspace,
    Char(char),
    Other,
}

impl From<KeyEvent> for Key {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Esc,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Esc,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

/// Text attributes for a drawn cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    Normal,
    Bold,
    Reversed,
}

impl From<TextStyle> for Style {
    fn from(style: TextStyle) -> Self {
        match style {
            TextStyle::Normal => Style::default(),
            TextStyle::Bold => Style::default().add_modifier(Modifier::BOLD),
            TextStyle::Reversed => Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

/// Terminal capabilities needed by the UI
pub trait Console {
    /// Screen size as `(rows, cols)`
    fn size(&self) -> Result<(u16, u16)>;

    /// Start a new frame
    fn clear(&mut self);

    /// Queue `text` at `row`, `col`.
    ///
    /// Fails with [`Error::Draw`] if the position is off screen; text running
    /// past the right edge is clipped.
    fn draw(&mut self, row: u16, col: u16, text: &str, style: TextStyle) -> Result<()>;

    /// Show the queued frame
    fn present(&mut self) -> Result<()>;

    /// Block until the next key press
    fn read_key(&mut self) -> Result<Key>;
}

/// Check a draw position against the screen and clip the text to fit
pub fn clip_to_screen(size: (u16, u16), row: u16, col: u16, text: &str) -> Result<String> {
    let (rows, cols) = size;
    if row >= rows || col >= cols {
        return Err(Error::Draw(format!(
            "position ({}, {}) outside {}x{} screen",
            row, col, rows, cols
        )));
    }
    Ok(text.chars().take((cols - col) as usize).collect())
}

struct Cell {
    row: u16,
    col: u16,
    text: String,
    style: TextStyle,
}

// Restores the terminal even if setup fails halfway.
struct TerminalRestore;

impl Drop for TerminalRestore {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
    }
}

/// [`Console`] backed by ratatui on crossterm
pub struct TerminalConsole {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    cells: Vec<Cell>,
    _restore: TerminalRestore,
}

impl TerminalConsole {
    /// Enter raw mode and the alternate screen
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let restore = TerminalRestore;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            cells: Vec::new(),
            _restore: restore,
        })
    }
}

impl Console for TerminalConsole {
    fn size(&self) -> Result<(u16, u16)> {
        let area = self.terminal.size()?;
        Ok((area.height, area.width))
    }

    fn clear(&mut self) {
        self.cells.clear();
    }

    fn draw(&mut self, row: u16, col: u16, text: &str, style: TextStyle) -> Result<()> {
        let text = clip_to_screen(self.size()?, row, col, text)?;
        self.cells.push(Cell { row, col, text, style });
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let cells = std::mem::take(&mut self.cells);
        self.terminal.draw(|f| {
            let area = f.size();
            for cell in &cells {
                // The screen may have shrunk since the cell was queued.
                if cell.row >= area.height || cell.col >= area.width {
                    continue;
                }
                let rect = Rect::new(cell.col, cell.row, area.width - cell.col, 1);
                let span = Span::styled(cell.text.as_str(), Style::from(cell.style));
                f.render_widget(Paragraph::new(span), rect);
            }
        })?;
        Ok(())
    }

    fn read_key(&mut self) -> Result<Key> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(Key::from(key)),
                // Redraw on resize.
                Event::Resize(_, _) => return Ok(Key::Other),
                _ => {}
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let press = |code| Key::from(KeyEvent::new(code, KeyModifiers::NONE));
        assert_eq!(press(KeyCode::Up), Key::Up);
        assert_eq!(press(KeyCode::PageDown), Key::PageDown);
        assert_eq!(press(KeyCode::Enter), Key::Enter);
        assert_eq!(press(KeyCode::Char('x')), Key::Char('x'));
        assert_eq!(press(KeyCode::F(1)), Key::Other);
        assert_eq!(
            Key::from(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Key::Esc
        );
    }

    #[test]
    fn test_clip_to_screen() {
        assert_eq!(clip_to_screen((10, 8), 0, 2, "abcdefgh").unwrap(), "abcdef");
        assert_eq!(clip_to_screen((10, 8), 9, 0, "ab").unwrap(), "ab");
        assert!(matches!(clip_to_screen((10, 8), 10, 0, "ab"), Err(Error::Draw(_))));
        assert!(matches!(clip_to_screen((10, 8), 0, 8, "ab"), Err(Error::Draw(_))));
    }

    #[test]
    fn test_clip_counts_chars_not_bytes() {
        assert_eq!(clip_to_screen((1, 3), 0, 0, "╔══╗").unwrap(), "╔══");
    }
}
