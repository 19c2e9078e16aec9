//! File-backed store persisting records as JSON files
//!
//! Each cache key maps to one pretty-printed JSON file in an XDG-compliant
//! cache directory (`~/.cache/oxr/` on Linux). Records are stored as-is:
//! freshness is the decorator's job, computed from the payload's own
//! timestamp, so no expiry metadata is written alongside.

use std::fs;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::fetch::CacheKey;
use super::store::{Store, StoreError};

/// Store that persists cached records to disk
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where record files are kept
    cache_dir: PathBuf,
}

impl FileStore {
    /// Creates a store using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g. no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "oxr")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a store rooted at a custom directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path of the file backing the given key
    fn record_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(format!("{key}.json"))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }
}

#[async_trait]
impl<T> Store<T> for FileStore
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn get(&self, key: &CacheKey) -> Result<Option<T>, StoreError> {
        let content = match fs::read_to_string(self.record_path(key)) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn put(&self, record: &T, key: &CacheKey) -> Result<(), StoreError> {
        self.ensure_dir()?;

        let json = serde_json::to_string_pretty(record)?;
        fs::write(self.record_path(key), json)?;

        Ok(())
    }
}
