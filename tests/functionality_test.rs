use penseek::render::formatter::NO_RESULTS;
use penseek::{Config, Console, CveStore, Error, FeedStatus, ImportLedger, Key, Result, Session, TextStyle};
use penseek::{calculate_file_hash, render_results};
use std::collections::VecDeque;
use std::fs;
use tempfile::TempDir;

/// Console that replays scripted keys and records every presented frame
struct ScriptedConsole {
    rows: u16,
    cols: u16,
    keys: VecDeque<Key>,
    pending: Vec<String>,
    frames: Vec<Vec<String>>,
}

impl ScriptedConsole {
    fn new(keys: &[Key]) -> Self {
        Self {
            rows: 40,
            cols: 100,
            keys: keys.iter().copied().collect(),
            pending: Vec::new(),
            frames: Vec::new(),
        }
    }

    fn saw(&self, text: &str) -> bool {
        self.frames.iter().flatten().any(|line| line.contains(text))
    }
}

impl Console for ScriptedConsole {
    fn size(&self) -> Result<(u16, u16)> {
        Ok((self.rows, self.cols))
    }

    fn clear(&mut self) {
        self.pending.clear();
    }

    fn draw(&mut self, row: u16, col: u16, text: &str, _style: TextStyle) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::Draw("off screen".to_string()));
        }
        self.pending.push(text.chars().take((self.cols - col) as usize).collect());
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.frames.push(self.pending.clone());
        Ok(())
    }

    fn read_key(&mut self) -> Result<Key> {
        self.keys.pop_front().ok_or_else(|| {
            Error::Io(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "script exhausted"))
        })
    }
}

fn chars(text: &str) -> Vec<Key> {
    text.chars().map(Key::Char).collect()
}

fn session(temp_dir: &TempDir, keys: Vec<Key>) -> Result<(Config, Session<ScriptedConsole>)> {
    let config = Config::new(Some(temp_dir.path().join("penseek_data")))?;
    config.init()?;
    let store = CveStore::open(&config)?;
    let ledger = ImportLedger::open(&config)?;
    let session = Session::new(ScriptedConsole::new(&keys), store, ledger, config.clone());
    Ok((config, session))
}

const SAMPLE_FEED: &str = r#"{"vulnerabilities": [{
    "cveID": "CVE-2024-0001",
    "shortDescription": "Sample bug",
    "dateAdded": "2024-01-01",
    "knownRansomwareCampaignUse": "Unknown"
}]}"#;

#[test]
fn test_import_then_search_through_menu() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();

    let mut keys = vec![
        Key::Enter,     // splash
        Key::Down,      // menu -> Update Database
        Key::Enter,
        Key::Enter,     // pick kev.json
        Key::Char(' '), // dismiss notice
        Key::Up,        // menu -> Search CVEs
        Key::Enter,
    ];
    keys.extend(chars("0001"));
    keys.push(Key::Enter); // submit query
    keys.push(Key::Esc); // leave browser
    keys.push(Key::Char('3')); // exit

    let (config, mut session) = session(&temp_dir, keys)?;
    fs::write(config.base_dir.join("kev.json"), SAMPLE_FEED)?;

    session.run()?;

    assert_eq!(session.store().count()?, 1);
    let console = session.console();
    assert!(console.keys.is_empty());
    assert!(console.saw("Database updated with 1 CVEs"));
    assert!(console.saw("kev.json  (new)"));
    assert!(console.saw("Enter search: "));
    assert!(console.saw("CVE-2024-0001  Unknown  2024-01-01  [NO EXPLOIT]"));
    assert!(console.saw("Description: Sample bug"));

    let hash = calculate_file_hash(&config.base_dir.join("kev.json"))?;
    assert_eq!(session.ledger().status("kev.json", &hash)?, FeedStatus::Imported);
    Ok(())
}

#[test]
fn test_search_without_matches_shows_no_results_block() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();

    let mut keys = vec![Key::Enter, Key::Enter];
    keys.extend(chars("nomatch"));
    keys.extend([Key::Enter, Key::Enter, Key::Char('3')]);

    let (_config, mut session) = session(&temp_dir, keys)?;
    session.run()?;

    let console = session.console();
    let browser_frame = console
        .frames
        .iter()
        .find(|frame| frame.iter().any(|line| line.contains("No results found!")))
        .expect("no-results frame");
    assert_eq!(browser_frame, &NO_RESULTS.map(str::to_string).to_vec());
    assert_eq!(render_results(&[], 60).len(), 3);
    Ok(())
}

#[test]
fn test_update_without_feeds_shows_notice() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let keys = vec![Key::Enter, Key::Char('2'), Key::Enter, Key::Char('3')];

    let (_config, mut session) = session(&temp_dir, keys)?;
    session.run()?;

    assert!(session.console().saw("No JSON files found in penseek_data."));
    assert!(session.console().keys.is_empty());
    Ok(())
}

#[test]
fn test_bad_feed_reports_error_and_keeps_data() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let keys = vec![
        Key::Enter,     // splash
        Key::Char('2'), // update
        Key::Down,      // bad.json sorts after a_good.json
        Key::Enter,
        Key::Enter,     // dismiss notice
        Key::Char('3'),
    ];

    let (config, mut session) = session(&temp_dir, keys)?;
    fs::write(config.base_dir.join("a_good.json"), SAMPLE_FEED)?;
    fs::write(config.base_dir.join("bad.json"), r#"{"catalogVersion": "1"}"#)?;

    session.run()?;

    let console = session.console();
    assert!(console.saw("Format error: missing vulnerabilities key"));
    assert_eq!(session.store().count()?, 0);
    assert!(session.ledger().get("bad.json")?.is_none());
    Ok(())
}

#[test]
fn test_escape_cancels_prompt_and_picker() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let keys = vec![
        Key::Enter,     // splash
        Key::Enter,     // search
        Key::Char('x'),
        Key::Esc,       // cancel prompt
        Key::Char('2'), // update
        Key::Esc,       // cancel picker
        Key::Char('3'),
    ];

    let (config, mut session) = session(&temp_dir, keys)?;
    fs::write(config.base_dir.join("kev.json"), SAMPLE_FEED)?;

    session.run()?;

    assert_eq!(session.store().count()?, 0);
    assert!(session.console().keys.is_empty());
    Ok(())
}

#[test]
fn test_browser_scrolls_long_results() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();

    let mut keys = vec![Key::Enter, Key::Enter, Key::Enter]; // splash, search, empty query
    keys.extend([Key::PageDown; 10]);
    keys.extend([Key::Esc, Key::Char('3')]);

    let (config, mut session) = session(&temp_dir, keys)?;
    let records: Vec<_> = (0..30)
        .map(|i| penseek::CveRecord::new(format!("CVE-2020-{:04}", i), "Scrolling", "Unknown", "2020-01-01", true))
        .collect();
    {
        let mut store = CveStore::open(&config)?;
        store.upsert_many(&records)?;
    }

    session.run()?;

    let lines = render_results(&records, 60);
    let console = session.console();
    let last_browser_frame = &console.frames[console.frames.len() - 2];
    // 40 rows -> 38 visible lines, scrolled to the end
    assert_eq!(last_browser_frame.len(), 38);
    assert_eq!(last_browser_frame.last(), lines.last());
    Ok(())
}
