use super::console::{Console, TextStyle};
use crate::core::config::Config;
use crate::core::error::Result;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::path::Path;

const WELCOME: &str = "Welcome to Penseek 1.0!";

const QUOTES: &[&str] = &[
    "Hack the planet!",
    "Access granted...",
    "Exploit found. Deploying payload...",
    "Data wants to be free.",
    "01100110 01101001 01101110 01100100 00100000 01101111 01110101 01110100",
];

/// Pick a quote for the bottom of the splash screen
pub fn pick_quote<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    QUOTES.choose(rng).copied().unwrap_or(WELCOME)
}

/// Read the banner, clipping each line to `max_width` characters
pub fn load_banner(path: &Path, max_width: usize) -> Option<Vec<String>> {
    let bytes = std::fs::read(path).ok()?;
    let text = String::from_utf8_lossy(&bytes);
    Some(
        text.lines()
            .map(|line| line.chars().take(max_width).collect())
            .collect(),
    )
}

fn centered_col(cols: u16, text_len: usize) -> u16 {
    ((cols as usize).saturating_sub(text_len) / 2) as u16
}

fn draw_quietly<C: Console>(console: &mut C, row: u16, col: u16, text: &str, style: TextStyle) {
    if let Err(e) = console.draw(row, col, text, style) {
        tracing::trace!(error = %e, "splash line not drawn");
    }
}

/// Show the banner (or a greeting) with a random quote, then wait for a key
pub fn show_splash<C: Console>(console: &mut C, config: &Config) -> Result<()> {
    let (rows, cols) = console.size()?;
    console.clear();

    match load_banner(&config.splash_path, (cols as usize).saturating_sub(4)) {
        Some(lines) => {
            let start_row = (rows as usize).saturating_sub(lines.len()) / 2;
            for (i, line) in lines.iter().enumerate() {
                let row = start_row + i;
                if row < rows as usize {
                    let col = centered_col(cols, line.chars().count());
                    draw_quietly(console, row as u16, col, line, TextStyle::Normal);
                }
            }
        }
        None => {
            tracing::debug!(path = %config.splash_path.display(), "no splash banner, using greeting");
            draw_quietly(console, rows / 2, centered_col(cols, 40), WELCOME, TextStyle::Bold);
        }
    }

    let quote = pick_quote(&mut rand::rng());
    draw_quietly(
        console,
        rows.saturating_sub(3),
        centered_col(cols, quote.chars().count()),
        quote,
        TextStyle::Bold,
    );

    console.present()?;
    console.read_key()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::console::fake::FakeConsole;
    use crate::ui::console::Key;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_pick_quote_is_from_list() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            assert!(QUOTES.contains(&pick_quote(&mut rng)));
        }
    }

    #[test]
    fn test_greeting_without_banner() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(Some(temp_dir.path().to_path_buf())).unwrap();
        let mut console = FakeConsole::new(24, 80, &[Key::Enter]);

        show_splash(&mut console, &config).unwrap();

        let frame = &console.frames[0];
        assert_eq!(frame[0], (12, 20, WELCOME.to_string()));
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[1].0, 21);
        assert!(console.keys.is_empty());
    }

    #[test]
    fn test_banner_is_centered_and_clipped() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(Some(temp_dir.path().to_path_buf())).unwrap();
        fs::write(&config.splash_path, "abcdefghijkl\nxy\n").unwrap();

        let lines = load_banner(&config.splash_path, 6).unwrap();
        assert_eq!(lines, vec!["abcdef", "xy"]);

        let mut console = FakeConsole::new(10, 10, &[Key::Char(' ')]);
        show_splash(&mut console, &config).unwrap();
        let frame = &console.frames[0];
        assert_eq!(frame[0], (4, 2, "abcdef".to_string()));
        assert_eq!(frame[1], (5, 4, "xy".to_string()));
    }

    #[test]
    fn test_tiny_screen_does_not_fail() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(Some(temp_dir.path().to_path_buf())).unwrap();
        let mut console = FakeConsole::new(1, 1, &[Key::Enter]);
        show_splash(&mut console, &config).unwrap();
    }
}
