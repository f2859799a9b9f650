use crate::core::error::{Error, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A feed file found in the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFile {
    pub path: PathBuf,
    /// File name relative to the data directory
    pub name: String,
}

/// List importable feed files directly inside `dir`, sorted by name
pub fn discover_feeds(dir: &Path) -> Result<Vec<FeedFile>> {
    if !dir.is_dir() {
        return Err(Error::Config(format!(
            "Data directory does not exist: {}",
            dir.display()
        )));
    }

    let mut feeds = Vec::new();

    // Only the top level of the data directory; ignore files play no role here.
    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build();

    for result in walker {
        match result {
            Ok(entry) => {
                let path = entry.path();
                if path.is_dir() {
                    continue;
                }

                let name = match path.file_name().and_then(|n| n.to_str()) {
                    Some(name) => name,
                    None => continue,
                };

                if is_feed_file(name) {
                    feeds.push(FeedFile {
                        path: path.to_path_buf(),
                        name: name.to_string(),
                    });
                }
            }
            Err(err) => {
                tracing::warn!("Failed to access entry in data directory: {}", err);
            }
        }
    }

    feeds.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(feeds)
}

/// Feed files are picked by a literal, case-sensitive `.json` suffix
pub fn is_feed_file(name: &str) -> bool {
    name.ends_with(".json")
}
