use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use oasst_core::ConfigCache;
use oasst_logging::{oasst_debug, oasst_warn};

use crate::persist::{AtomicFileWriter, PersistError};

/// File name used when no cache path is configured.
pub const DEFAULT_CACHE_FILE: &str = "oasst_chat_config.json";

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to read cache {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cache {path:?} is not a valid record: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize cache record: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Single-record store for the chat configuration. Last write wins.
#[derive(Debug, Clone)]
pub struct ConfigCacheStore {
    writer: AtomicFileWriter,
}

impl ConfigCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.writer.target()
    }

    /// `Ok(None)` when nothing has been stored yet.
    pub fn load(&self) -> Result<Option<ConfigCache>, CacheError> {
        let path = self.path();
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| CacheError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Like [`load`](Self::load), but an unreadable record counts as absent.
    pub fn load_or_empty(&self) -> Option<ConfigCache> {
        match self.load() {
            Ok(cache) => cache,
            Err(err) => {
                oasst_warn!("Ignoring chat config cache: {}", err);
                None
            }
        }
    }

    pub fn save(&self, cache: &ConfigCache) -> Result<(), CacheError> {
        let content = serde_json::to_string_pretty(cache).map_err(CacheError::Serialize)?;
        self.writer.write(&content)?;
        oasst_debug!("Stored chat config cache at {:?}", self.path());
        Ok(())
    }
}
