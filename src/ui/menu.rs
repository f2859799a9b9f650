use super::browser::browse;
use super::console::{Console, Key, TextStyle};
use super::splash::show_splash;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::feed::discovery::{discover_feeds, FeedFile};
use crate::feed::importer::FeedImporter;
use crate::render::formatter::render_results;
use crate::storage::cves::CveStore;
use crate::storage::state::{calculate_file_hash, ImportLedger};

const SEARCH_PROMPT: &str = "Enter search: ";
const CONTINUE_HINT: &str = "Press any key to continue...";

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Search,
    UpdateDatabase,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Search, MenuItem::UpdateDatabase, MenuItem::Exit];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Search => "[1] Search CVEs",
            MenuItem::UpdateDatabase => "[2] Update Database",
            MenuItem::Exit => "[3] Exit",
        }
    }

    fn from_shortcut(c: char) -> Option<Self> {
        match c {
            '1' => Some(MenuItem::Search),
            '2' => Some(MenuItem::UpdateDatabase),
            '3' => Some(MenuItem::Exit),
            _ => None,
        }
    }
}

/// Frame a message in a box sized to fit it
pub fn boxed_message(text: &str) -> Vec<String> {
    let rule = "═".repeat(text.chars().count() + 4);
    vec![
        format!("╔{}╗", rule),
        format!("║  {}  ║", text),
        format!("╚{}╝", rule),
    ]
}

/// Move a list selection one step, staying in `0..len`
fn step_selection(selected: usize, key: Key, len: usize) -> usize {
    match key {
        Key::Up => selected.saturating_sub(1),
        Key::Down if selected + 1 < len => selected + 1,
        _ => selected,
    }
}

/// One interactive session: splash, then the main menu until Exit
pub struct Session<C: Console> {
    console: C,
    store: CveStore,
    ledger: ImportLedger,
    importer: FeedImporter,
    config: Config,
}

impl<C: Console> Session<C> {
    pub fn new(console: C, store: CveStore, ledger: ImportLedger, config: Config) -> Self {
        Self {
            console,
            store,
            ledger,
            importer: FeedImporter::new(&config),
            config,
        }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn store(&self) -> &CveStore {
        &self.store
    }

    pub fn ledger(&self) -> &ImportLedger {
        &self.ledger
    }

    pub fn run(&mut self) -> Result<()> {
        show_splash(&mut self.console, &self.config)?;
        self.main_menu()
    }

    fn draw_quietly(&mut self, row: u16, col: u16, text: &str, style: TextStyle) {
        if let Err(e) = self.console.draw(row, col, text, style) {
            tracing::trace!(error = %e, "menu text not drawn");
        }
    }

    fn main_menu(&mut self) -> Result<()> {
        let mut selected = 0usize;

        loop {
            let (rows, cols) = self.console.size()?;
            self.console.clear();

            let header = match self.store.count() {
                Ok(n) => format!("Penseek 1.0 - {} CVEs in database", n),
                Err(_) => "Penseek 1.0".to_string(),
            };
            self.draw_quietly(1, 2, &header, TextStyle::Bold);

            let top = (rows / 2).saturating_sub(MenuItem::ALL.len() as u16 / 2);
            for (i, item) in MenuItem::ALL.iter().enumerate() {
                let label = item.label();
                let col = (cols / 2).saturating_sub(label.len() as u16 / 2);
                let style = if i == selected {
                    TextStyle::Reversed
                } else {
                    TextStyle::Normal
                };
                self.draw_quietly(top + i as u16, col, label, style);
            }
            self.console.present()?;

            let key = self.console.read_key()?;
            let chosen = match key {
                Key::Enter => Some(MenuItem::ALL[selected]),
                Key::Char(c) => MenuItem::from_shortcut(c),
                _ => {
                    selected = step_selection(selected, key, MenuItem::ALL.len());
                    None
                }
            };

            match chosen {
                Some(MenuItem::Search) => self.search()?,
                Some(MenuItem::UpdateDatabase) => self.update_database()?,
                Some(MenuItem::Exit) => return Ok(()),
                None => {}
            }
        }
    }

    /// Prompt for a query. `None` if the user pressed Esc.
    fn prompt_query(&mut self) -> Result<Option<String>> {
        let mut query = String::new();
        let input_col = 2 + SEARCH_PROMPT.len() as u16;

        loop {
            self.console.clear();
            self.draw_quietly(2, 2, SEARCH_PROMPT, TextStyle::Bold);
            self.draw_quietly(2, input_col, &query, TextStyle::Normal);
            self.console.present()?;

            match self.console.read_key()? {
                Key::Enter => return Ok(Some(query)),
                Key::Esc => return Ok(None),
                Key::Backspace => {
                    query.pop();
                }
                Key::Char(c) if !c.is_control() && query.chars().count() < self.config.query_max_len => {
                    query.push(c);
                }
                _ => {}
            }
        }
    }

    /// Search flow: prompt, query the store, render and browse the results
    pub fn search(&mut self) -> Result<()> {
        let query = match self.prompt_query()? {
            Some(query) => query,
            None => return Ok(()),
        };

        let results = match self.store.search(&query) {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(error = %e, "search failed");
                return self.notice(&[e.to_string()]);
            }
        };

        tracing::info!(query = %query, hits = results.len(), "search");
        let lines = render_results(&results, self.config.result_width);
        browse(&mut self.console, &lines)
    }

    /// Update flow: pick a feed from the data directory and import it
    pub fn update_database(&mut self) -> Result<()> {
        let feeds = match discover_feeds(&self.config.base_dir) {
            Ok(feeds) => feeds,
            Err(e) => {
                tracing::warn!(error = %e, "feed discovery failed");
                Vec::new()
            }
        };

        if feeds.is_empty() {
            return self.notice(&["No JSON files found in penseek_data.".to_string()]);
        }

        let index = match self.pick_feed(&feeds)? {
            Some(index) => index,
            None => return Ok(()),
        };
        let feed = &feeds[index];

        let message = match self.importer.import_file(&mut self.store, &feed.name) {
            Ok(report) => {
                if let Err(e) = self.ledger.record_import(
                    &report.file_name,
                    report.content_hash.clone(),
                    report.records_written,
                ) {
                    tracing::warn!(file = %report.file_name, error = %e, "failed to update import ledger");
                }
                boxed_message(&format!("Database updated with {} CVEs", report.records_written))
            }
            Err(e) => vec![format!("Error updating database from {}: {}", feed.name, e)],
        };

        self.notice(&message)
    }

    fn feed_label(&self, feed: &FeedFile) -> String {
        let status = calculate_file_hash(&feed.path)
            .and_then(|hash| self.ledger.status(&feed.name, &hash))
            .map(|status| status.label())
            .unwrap_or("unreadable");
        format!("{}  ({})", feed.name, status)
    }

    fn pick_feed(&mut self, feeds: &[FeedFile]) -> Result<Option<usize>> {
        let labels: Vec<String> = feeds.iter().map(|feed| self.feed_label(feed)).collect();
        let mut selected = 0usize;

        loop {
            self.console.clear();
            self.draw_quietly(2, 2, "Select a JSON file to update the database:", TextStyle::Bold);
            for (i, label) in labels.iter().enumerate() {
                let style = if i == selected {
                    TextStyle::Reversed
                } else {
                    TextStyle::Normal
                };
                self.draw_quietly(4 + i as u16, 2, label, style);
            }
            self.console.present()?;

            match self.console.read_key()? {
                Key::Enter => return Ok(Some(selected)),
                Key::Esc => return Ok(None),
                key => selected = step_selection(selected, key, feeds.len()),
            }
        }
    }

    /// Show `lines` and wait for any key
    fn notice(&mut self, lines: &[String]) -> Result<()> {
        self.console.clear();
        for (i, line) in lines.iter().enumerate() {
            self.draw_quietly(2 + i as u16, 2, line, TextStyle::Normal);
        }
        self.draw_quietly(3 + lines.len() as u16, 2, CONTINUE_HINT, TextStyle::Normal);
        self.console.present()?;
        self.console.read_key()?;
        Ok(())
    }
}
