use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The data directory or database file could not be prepared. Fatal.
    #[error("Storage initialization error: {0}")]
    StorageInit(String),

    /// A batch write failed and was rolled back.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The feed document is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The feed document is valid JSON but lacks the expected structure.
    #[error("Format error: {0}")]
    Format(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Draw error: {0}")]
    Draw(String),
}

pub type Result<T> = std::result::Result<T, Error>;
