//! JSON file persistence for the backlog store.
//!
//! The whole document is rewritten on every save; there is no incremental
//! or append persistence. Missing or corrupt files degrade to an empty
//! store on load (first-run / recovery behavior), and failed saves are
//! logged rather than surfaced: the service favors availability over
//! strict durability.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::error::Result;
use crate::model::Store;

/// File-backed store with best-effort load/save semantics.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the store, degrading every failure to an empty store.
    ///
    /// A missing file is the documented first-run case and is not logged.
    /// Parse failures and other read errors are logged distinctly so an
    /// I/O problem masquerading as "empty store" can be told apart from a
    /// genuine first run.
    #[must_use]
    pub fn load(&self) -> Store {
        if !self.path.exists() {
            return Store::default();
        }
        match self.try_load() {
            Ok(store) => store,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to load store; starting empty");
                Store::default()
            }
        }
    }

    /// Save the store, logging failures instead of raising them.
    ///
    /// Callers must not assume persistence succeeded.
    pub fn save(&self, store: &Store) {
        if let Err(e) = self.try_save(store) {
            error!(path = %self.path.display(), error = %e, "failed to save store");
        }
    }

    /// Fallible load.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, or `Json` if the content
    /// is not a valid store document.
    pub fn try_load(&self) -> Result<Store> {
        let content = fs::read_to_string(&self.path)?;
        let store: Store = serde_json::from_str(&content)?;
        Ok(store)
    }

    /// Fallible save with atomic write (temp file + rename).
    ///
    /// Serializes with stable 2-space indentation for human readability.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written.
    pub fn try_save(&self, store: &Store) -> Result<()> {
        let json = serde_json::to_string_pretty(store)?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
