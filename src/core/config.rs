use super::error::{Error, Result};
use std::path::PathBuf;

/// Default width of the rendered search results box
pub const DEFAULT_RESULT_WIDTH: usize = 60;
/// Maximum length of a search query typed at the prompt
pub const DEFAULT_QUERY_MAX_LEN: usize = 50;

/// Configuration for penseek
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory holding the database, feeds and splash banner
    pub base_dir: PathBuf,
    /// Path to the CVE database
    pub database_path: PathBuf,
    /// Path to the import ledger
    pub state_path: PathBuf,
    /// Path to the optional splash banner
    pub splash_path: PathBuf,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Width of the rendered results box
    pub result_width: usize,
    /// Maximum search query length
    pub query_max_len: usize,
}

impl Config {
    /// Get the default data directory
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
            .map(|home| home.join("penseek_1.0").join("penseek_data"))
    }

    /// Create a new configuration
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.unwrap_or_else(|| {
            Self::default_base_dir().unwrap_or_else(|_| PathBuf::from("penseek_data"))
        });

        Ok(Self {
            database_path: base_dir.join("penseek.db"),
            state_path: base_dir.join("state").join("imports.redb"),
            splash_path: base_dir.join("splash.ans"),
            log_dir: base_dir.join("logs"),
            result_width: DEFAULT_RESULT_WIDTH,
            query_max_len: DEFAULT_QUERY_MAX_LEN,
            base_dir,
        })
    }

    /// Create the data, state and log directories
    pub fn init(&self) -> Result<()> {
        let dirs = [
            Some(self.base_dir.as_path()),
            self.state_path.parent(),
            Some(self.log_dir.as_path()),
        ];
        for dir in dirs.into_iter().flatten() {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::StorageInit(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Check if the data directory already exists
    pub fn is_initialized(&self) -> bool {
        self.base_dir.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_derive_from_base_dir() {
        let config = Config::new(Some(PathBuf::from("/tmp/pdata"))).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/pdata/penseek.db"));
        assert_eq!(config.splash_path, PathBuf::from("/tmp/pdata/splash.ans"));
        assert_eq!(config.state_path, PathBuf::from("/tmp/pdata/state/imports.redb"));
        assert_eq!(config.result_width, 60);
        assert_eq!(config.query_max_len, 50);
    }

    #[test]
    fn test_init_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(Some(temp_dir.path().join("penseek_data"))).unwrap();
        assert!(!config.is_initialized());

        config.init().unwrap();
        assert!(config.is_initialized());
        assert!(config.state_path.parent().unwrap().exists());
        assert!(config.log_dir.exists());

        // Idempotent
        config.init().unwrap();
    }

    #[test]
    fn test_init_fails_when_base_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let config = Config::new(Some(blocker.join("penseek_data"))).unwrap();
        assert!(matches!(config.init(), Err(Error::StorageInit(_))));
    }
}
