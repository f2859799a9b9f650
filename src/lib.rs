// Core functionality
pub mod core {
    pub mod config;
    pub mod error;
    pub mod logging;
}

// Data storage
pub mod storage {
    pub mod cves;
    pub mod state;
}

// Feed import pipeline
pub mod feed {
    pub mod discovery;
    pub mod importer;
}

// Result rendering
pub mod render {
    pub mod formatter;
}

// User interfaces
pub mod ui {
    pub mod browser;
    pub mod console;
    pub mod menu;
    pub mod splash;
}

// Re-export commonly used types
pub use self::core::error::{Error, Result};
pub use self::core::config::Config;
pub use storage::cves::{CveRecord, CveStore};
pub use storage::state::{ImportLedger, FeedStatus, calculate_file_hash};
pub use feed::discovery::{discover_feeds, FeedFile};
pub use feed::importer::{FeedImporter, ImportReport, exploit_available, parse_feed};
pub use render::formatter::render_results;
pub use ui::browser::{browse, BrowseAction, ScrollState};
pub use ui::console::{Console, Key, TerminalConsole, TextStyle};
pub use ui::menu::Session;
