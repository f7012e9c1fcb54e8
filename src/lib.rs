//! `backlog_manager` - issues and tasks with file-based storage.
//!
//! A backlog-tracking service: issues, each holding a set of tasks,
//! persisted to a single JSON document and manipulated through a small
//! set of operations. Task-level operations are scoped by the session's
//! active issue.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Store, Issue, Task, Status)
//! - [`store`] - JSON file persistence with degrade-to-empty recovery
//! - [`service`] - The operations, sessions, and the mutation gate
//! - [`server`] - Newline-delimited JSON transport over stdio
//! - [`format`] - Legacy text rendering of replies and errors
//! - [`config`] - Store path resolution
//! - [`error`] - Error types and handling
//! - [`util`] - Task ID generation
//!
//! # Quick Start
//!
//! ```no_run
//! use backlog_manager::service::{BacklogService, Session};
//! use backlog_manager::store::FileStore;
//!
//! let service = BacklogService::new(FileStore::new("tasks.json"));
//! let mut session = Session::new();
//!
//! service.create_issue(&mut session, "Auth", "Login work", "New").unwrap();
//! service.add_task(&session, "Login flow", "").unwrap();
//! let tasks = service.list_tasks(&session, None).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod server;
pub mod service;
pub mod store;
pub mod util;

pub use error::{BacklogError, Result};
pub use model::{Issue, Status, Store, Task};
pub use service::{BacklogService, Reply, Session};
pub use store::FileStore;
