//! Backlog service operations.
//!
//! Every operation runs a full load-mutate-save cycle against the file
//! store; there is no in-memory cache between calls, so out-of-band edits
//! to the store file are picked up on the next call. A single mutex
//! serializes the cycles, eliminating the lost-update race two concurrent
//! callers would otherwise hit on the shared file.
//!
//! Task-scoped operations are scoped by the [`Session`]'s active issue.
//! The session holds a reference (the issue name), not the issue itself:
//! it is re-resolved against the freshly loaded store on every call.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;

use crate::error::{BacklogError, Result};
use crate::model::{Issue, OrderedMap, Status, Task};
use crate::store::FileStore;
use crate::util;

/// Per-connection session state.
///
/// Holds the currently selected issue, if any. Set by `create_issue`,
/// `initialize_issue`, and `select_issue`; never implicitly cleared.
/// Not persisted.
#[derive(Debug, Default)]
pub struct Session {
    active_issue: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the currently selected issue, if any.
    #[must_use]
    pub fn active_issue(&self) -> Option<&str> {
        self.active_issue.as_deref()
    }
}

/// One issue line of a `list_issues` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    pub name: String,
    pub active: bool,
    pub status: Status,
    pub task_count: usize,
    pub description: String,
}

/// One task of a `list_tasks` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    pub id: String,
    pub title: String,
    pub status: Status,
    pub description: String,
}

/// Success payload of a service operation.
///
/// The transport renders these into the legacy text form via
/// [`crate::format::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    IssueCreated {
        name: String,
        status: Status,
    },
    /// `list_issues` on an empty store: guidance instead of an empty list.
    NoIssues,
    IssueList(Vec<IssueSummary>),
    IssueSelected {
        name: String,
    },
    IssueInitialized {
        name: String,
        status: Status,
    },
    IssueStatusUpdated {
        name: String,
        old: Status,
        new: Status,
    },
    TaskAdded {
        issue: String,
        id: String,
        title: String,
    },
    /// `list_tasks` on an issue with zero tasks.
    NoTasks {
        issue: String,
    },
    TaskList {
        issue: String,
        description: String,
        filter: Option<Status>,
        /// Tasks surviving the filter, in insertion order. May be empty
        /// when the filter removed everything; the rendering reports that
        /// explicitly rather than emitting a bare empty body.
        tasks: Vec<TaskEntry>,
    },
    TaskStatusUpdated {
        id: String,
        title: String,
        old: Status,
        new: Status,
    },
}

/// The backlog service. One instance per store file, shared across
/// sessions.
#[derive(Debug)]
pub struct BacklogService {
    store: FileStore,
    /// Serializes every load-mutate-save cycle (see module docs).
    gate: Mutex<()>,
}

impl BacklogService {
    #[must_use]
    pub fn new(store: FileStore) -> Self {
        Self {
            store,
            gate: Mutex::new(()),
        }
    }

    /// Create a new issue and make it the session's active issue.
    ///
    /// # Errors
    ///
    /// Returns `IssueExists` if the name is already taken (case-sensitive
    /// exact match), or `InvalidStatus` if `status` is not a valid status.
    pub fn create_issue(
        &self,
        session: &mut Session,
        name: &str,
        description: &str,
        status: &str,
    ) -> Result<Reply> {
        let _guard = self.lock();
        let mut store = self.store.load();

        if store.issues.contains_key(name) {
            return Err(BacklogError::IssueExists {
                name: name.to_string(),
            });
        }
        let status: Status = status.parse()?;

        store.issues.insert(
            name,
            Issue {
                description: description.to_string(),
                status: Some(status),
                tasks: OrderedMap::new(),
            },
        );
        self.store.save(&store);

        session.active_issue = Some(name.to_string());
        Ok(Reply::IssueCreated {
            name: name.to_string(),
            status,
        })
    }

    /// List all issues in insertion order.
    pub fn list_issues(&self, session: &Session) -> Result<Reply> {
        let _guard = self.lock();
        let store = self.store.load();

        if store.issues.is_empty() {
            return Ok(Reply::NoIssues);
        }

        let summaries = store
            .issues
            .iter()
            .map(|(name, issue)| IssueSummary {
                name: name.to_string(),
                active: session.active_issue() == Some(name),
                status: issue.display_status(),
                task_count: issue.tasks.len(),
                description: issue.description.clone(),
            })
            .collect();
        Ok(Reply::IssueList(summaries))
    }

    /// Select an existing issue as the session's active issue.
    ///
    /// Session-only mutation; nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the name is not in the store.
    pub fn select_issue(&self, session: &mut Session, name: &str) -> Result<Reply> {
        let _guard = self.lock();
        let store = self.store.load();

        if !store.issues.contains_key(name) {
            return Err(BacklogError::IssueNotFound {
                name: name.to_string(),
            });
        }

        session.active_issue = Some(name.to_string());
        Ok(Reply::IssueSelected {
            name: name.to_string(),
        })
    }

    /// Create or reset the named issue, discarding any prior tasks.
    ///
    /// Unlike `create_issue`, an existing name is not an error: this is an
    /// explicit reset. The issue keeps its position in the listing order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatus` if `status` is not a valid status.
    pub fn initialize_issue(
        &self,
        session: &mut Session,
        name: &str,
        description: &str,
        status: &str,
    ) -> Result<Reply> {
        let _guard = self.lock();
        let mut store = self.store.load();

        let status: Status = status.parse()?;

        store.issues.insert(
            name,
            Issue {
                description: description.to_string(),
                status: Some(status),
                tasks: OrderedMap::new(),
            },
        );
        self.store.save(&store);

        session.active_issue = Some(name.to_string());
        Ok(Reply::IssueInitialized {
            name: name.to_string(),
            status,
        })
    }

    /// Update the status of an issue.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the issue is absent, or `InvalidStatus`
    /// if `status` is not a valid status.
    pub fn update_issue_status(&self, name: &str, status: &str) -> Result<Reply> {
        let _guard = self.lock();
        let mut store = self.store.load();

        let Some(issue) = store.issues.get_mut(name) else {
            return Err(BacklogError::IssueNotFound {
                name: name.to_string(),
            });
        };
        let new: Status = status.parse()?;

        let old = issue.display_status();
        issue.status = Some(new);
        self.store.save(&store);

        Ok(Reply::IssueStatusUpdated {
            name: name.to_string(),
            old,
            new,
        })
    }

    /// Add a task to the active issue, with status `New` and a generated
    /// ID unique within that issue.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveIssue` if the session has no selection, or
    /// `IssueNotFound` if the active issue no longer resolves in the
    /// freshly loaded store.
    pub fn add_task(&self, session: &Session, title: &str, description: &str) -> Result<Reply> {
        let _guard = self.lock();
        let active = Self::active(session)?;
        let mut store = self.store.load();

        let Some(issue) = store.issues.get_mut(active) else {
            return Err(BacklogError::IssueNotFound {
                name: active.to_string(),
            });
        };

        let id = util::generate_task_id(title, description, Utc::now(), |candidate| {
            issue.tasks.contains_key(candidate)
        });
        issue.tasks.insert(
            id.clone(),
            Task {
                title: title.to_string(),
                description: description.to_string(),
                status: Status::New,
            },
        );
        self.store.save(&store);

        Ok(Reply::TaskAdded {
            issue: active.to_string(),
            id,
            title: title.to_string(),
        })
    }

    /// List the active issue's tasks in insertion order, optionally
    /// filtered by status.
    ///
    /// An issue with zero tasks reports "no tasks" before the filter is
    /// even validated, matching the original operation ordering.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveIssue`, `IssueNotFound`, or `InvalidStatus` for an
    /// unparsable filter.
    pub fn list_tasks(&self, session: &Session, status_filter: Option<&str>) -> Result<Reply> {
        let _guard = self.lock();
        let active = Self::active(session)?;
        let store = self.store.load();

        let Some(issue) = store.issues.get(active) else {
            return Err(BacklogError::IssueNotFound {
                name: active.to_string(),
            });
        };

        if issue.tasks.is_empty() {
            return Ok(Reply::NoTasks {
                issue: active.to_string(),
            });
        }

        let filter: Option<Status> = status_filter.map(str::parse).transpose()?;

        let tasks = issue
            .tasks
            .iter()
            .filter(|(_, task)| filter.is_none_or(|f| task.status == f))
            .map(|(id, task)| TaskEntry {
                id: id.to_string(),
                title: task.title.clone(),
                status: task.status,
                description: task.description.clone(),
            })
            .collect();

        Ok(Reply::TaskList {
            issue: active.to_string(),
            description: issue.description.clone(),
            filter,
            tasks,
        })
    }

    /// Update the status of a task in the active issue.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveIssue`, `IssueNotFound`, `TaskNotFound`, or
    /// `InvalidStatus`.
    pub fn update_task_status(
        &self,
        session: &Session,
        task_id: &str,
        status: &str,
    ) -> Result<Reply> {
        let _guard = self.lock();
        let active = Self::active(session)?;
        let mut store = self.store.load();

        let Some(issue) = store.issues.get_mut(active) else {
            return Err(BacklogError::IssueNotFound {
                name: active.to_string(),
            });
        };
        let Some(task) = issue.tasks.get_mut(task_id) else {
            return Err(BacklogError::TaskNotFound {
                id: task_id.to_string(),
                issue: active.to_string(),
            });
        };
        let new: Status = status.parse()?;

        let old = task.status;
        task.status = new;
        let title = task.title.clone();
        self.store.save(&store);

        Ok(Reply::TaskStatusUpdated {
            id: task_id.to_string(),
            title,
            old,
            new,
        })
    }

    fn active(session: &Session) -> Result<&str> {
        session.active_issue().ok_or(BacklogError::NoActiveIssue)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned gate only means another thread panicked mid-cycle;
        // the store on disk is still consistent (atomic rename).
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
