//! Configuration for the backlog manager.
//!
//! Resolution order: CLI flag > environment > default. The only setting
//! the core consumes is the store file path (`TASKS_FILE`, default
//! `tasks.json`); the original's `HOST`/`PORT`/`TRANSPORT` variables
//! belong to the network transport, which this build does not ship.

use std::path::PathBuf;

/// Default store file path, relative to the working directory.
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the backlog store file.
    pub tasks_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: PathBuf::from(DEFAULT_TASKS_FILE),
        }
    }
}

impl Config {
    /// Build a config from an explicit path, falling back to the
    /// `TASKS_FILE` environment variable and then the default.
    #[must_use]
    pub fn resolve(tasks_file: Option<PathBuf>) -> Self {
        let tasks_file = tasks_file
            .or_else(|| std::env::var_os("TASKS_FILE").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TASKS_FILE));
        Self { tasks_file }
    }
}
