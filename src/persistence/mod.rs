//! Save/load persistence for small JSON documents
//!
//! Features:
//! - Plain JSON documents (settings, high-score record, profile)
//! - Atomic replace: write to a temp file in the same directory, then rename
//!   over the target, so a crash mid-write leaves the old file intact
//! - Missing or corrupt files degrade to defaults via `load_or_default`

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use thiserror::Error;

/// File names inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";
pub const HIGHSCORE_FILE: &str = "highscore.json";
pub const PROFILE_FILE: &str = "profile.json";

/// Persistence failures. Callers in the game log these and carry on.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} has no parent directory")]
    NoParent(PathBuf),
}

impl PersistenceError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when the document simply does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Directory holding every persisted document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn highscore_path(&self) -> PathBuf {
        self.root.join(HIGHSCORE_FILE)
    }

    pub fn profile_path(&self) -> PathBuf {
        self.root.join(PROFILE_FILE)
    }
}

impl Default for DataDir {
    fn default() -> Self {
        Self::new(".rockfall")
    }
}

/// Read and parse a JSON document
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let text = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| PersistenceError::json(path, e))
}

/// Load a document, falling back to its default on any failure
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path) {
        Ok(value) => {
            log::info!("Loaded {}", path.display());
            value
        }
        Err(e) if e.is_not_found() => {
            log::info!("No {} found, using defaults", path.display());
            T::default()
        }
        Err(e) => {
            log::warn!("{}; using defaults", e);
            T::default()
        }
    }
}

/// Serialize and atomically replace a JSON document
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let dir = path
        .parent()
        .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
        .ok_or_else(|| PersistenceError::NoParent(path.to_path_buf()))?;
    fs::create_dir_all(dir).map_err(|e| PersistenceError::io(dir, e))?;

    let json = serde_json::to_vec_pretty(value).map_err(|e| PersistenceError::json(path, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PersistenceError::io(dir, e))?;
    tmp.write_all(&json)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| PersistenceError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| PersistenceError::io(path, e.error))?;
    log::debug!("Saved {}", path.display());
    Ok(())
}
