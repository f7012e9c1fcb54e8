//! Legacy text rendering for service replies and errors.
//!
//! Success and error share one text channel; callers distinguish by the
//! `Error: ` prefix, so the message text here must stay stable. The
//! wording reproduces the original backlog manager responses verbatim.

use crate::error::BacklogError;
use crate::model::Status;
use crate::service::{IssueSummary, Reply, TaskEntry};

/// Description preview length in `list_issues` output.
const PREVIEW_LEN: usize = 30;

/// Render a success reply into the legacy text form.
#[must_use]
pub fn render(reply: &Reply) -> String {
    match reply {
        Reply::IssueCreated { name, status } => {
            format!("Successfully created issue: {name} with status: {status}")
        }
        Reply::NoIssues => {
            "No issues found. Use 'create_issue' to create a new issue.".to_string()
        }
        Reply::IssueList(issues) => render_issue_list(issues),
        Reply::IssueSelected { name } => format!("Selected issue: {name}"),
        Reply::IssueInitialized { name, status } => {
            format!("Successfully initialized issue: {name} with status: {status}")
        }
        Reply::IssueStatusUpdated { name, old, new } => {
            format!("Successfully updated issue '{name}' status from '{old}' to '{new}'.")
        }
        Reply::TaskAdded { issue, id, title } => {
            format!("Successfully added task: {title} (ID: {id}) to issue '{issue}'")
        }
        Reply::NoTasks { issue } => format!("No tasks found in issue '{issue}'."),
        Reply::TaskList {
            issue,
            description,
            filter,
            tasks,
        } => render_task_list(issue, description, *filter, tasks),
        Reply::TaskStatusUpdated {
            id,
            title,
            old,
            new,
        } => {
            format!("Successfully updated task '{title}' (ID: {id}) status from '{old}' to '{new}'.")
        }
    }
}

/// Render an error into the legacy `Error: ...` text form.
#[must_use]
pub fn render_error(err: &BacklogError) -> String {
    format!("Error: {err}")
}

fn render_issue_list(issues: &[IssueSummary]) -> String {
    let mut lines = vec!["Available issues:".to_string()];
    for issue in issues {
        let active_marker = if issue.active { " (active)" } else { "" };
        lines.push(format!(
            "- {}{}: Status: {}, Tasks: {}",
            issue.name, active_marker, issue.status, issue.task_count
        ));
        let preview = preview(&issue.description);
        if !preview.is_empty() {
            lines.push(format!("  Description: {preview}"));
        }
    }
    lines.join("\n")
}

fn render_task_list(
    issue: &str,
    description: &str,
    filter: Option<Status>,
    tasks: &[TaskEntry],
) -> String {
    if tasks.is_empty() {
        return filter.map_or_else(
            || "No tasks found".to_string(),
            |status| format!("No tasks found with status '{status}'"),
        );
    }

    let mut lines = vec![format!("Tasks for issue: {issue}")];
    if !description.is_empty() {
        lines.push(format!("Issue description: {description}"));
    }

    for task in tasks {
        // Blank separator line before each task block.
        lines.push(format!("\nID: {}", task.id));
        lines.push(format!("Title: {}", task.title));
        lines.push(format!("Status: {}", task.status));
        if !task.description.is_empty() {
            lines.push(format!("Description: {}", task.description));
        }
    }
    lines.join("\n")
}

/// Truncate a description to 30 chars, with an ellipsis suffix only when
/// something was actually cut.
fn preview(description: &str) -> String {
    let truncated: String = description.chars().take(PREVIEW_LEN).collect();
    if !truncated.is_empty() && description.chars().count() > PREVIEW_LEN {
        format!("{truncated}...")
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_created_text() {
        let text = render(&Reply::IssueCreated {
            name: "Alpha".to_string(),
            status: Status::New,
        });
        assert_eq!(text, "Successfully created issue: Alpha with status: New");
    }

    #[test]
    fn test_issue_list_text() {
        let text = render(&Reply::IssueList(vec![
            IssueSummary {
                name: "Alpha".to_string(),
                active: true,
                status: Status::InWork,
                task_count: 2,
                description: "Short".to_string(),
            },
            IssueSummary {
                name: "Beta".to_string(),
                active: false,
                status: Status::New,
                task_count: 0,
                description: String::new(),
            },
        ]));
        let expected = [
            "Available issues:",
            "- Alpha (active): Status: InWork, Tasks: 2",
            "  Description: Short",
            "- Beta: Status: New, Tasks: 0",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_preview_truncates_past_30_chars() {
        let long = "a".repeat(31);
        assert_eq!(preview(&long), format!("{}...", "a".repeat(30)));
        // Exactly 30 chars: no ellipsis.
        let exact = "b".repeat(30);
        assert_eq!(preview(&exact), exact);
    }

    #[test]
    fn test_task_list_text_with_blank_separators() {
        let text = render(&Reply::TaskList {
            issue: "Auth".to_string(),
            description: "Login work".to_string(),
            filter: None,
            tasks: vec![
                TaskEntry {
                    id: "ab12cd34".to_string(),
                    title: "Login flow".to_string(),
                    status: Status::Done,
                    description: "OIDC".to_string(),
                },
                TaskEntry {
                    id: "ef56gh78".to_string(),
                    title: "Logout flow".to_string(),
                    status: Status::New,
                    description: String::new(),
                },
            ],
        });
        assert_eq!(
            text,
            "Tasks for issue: Auth\n\
             Issue description: Login work\n\
             \nID: ab12cd34\n\
             Title: Login flow\n\
             Status: Done\n\
             Description: OIDC\n\
             \nID: ef56gh78\n\
             Title: Logout flow\n\
             Status: New"
        );
    }

    #[test]
    fn test_filtered_empty_task_list_text() {
        let text = render(&Reply::TaskList {
            issue: "Auth".to_string(),
            description: String::new(),
            filter: Some(Status::Done),
            tasks: vec![],
        });
        assert_eq!(text, "No tasks found with status 'Done'");
    }

    #[test]
    fn test_error_texts() {
        assert_eq!(
            render_error(&BacklogError::IssueExists {
                name: "Alpha".to_string()
            }),
            "Error: Issue 'Alpha' already exists."
        );
        assert_eq!(
            render_error(&BacklogError::InvalidStatus {
                status: "Bogus".to_string()
            }),
            "Error: Invalid status 'Bogus'. Valid values are: New, InWork, Done"
        );
        assert_eq!(
            render_error(&BacklogError::NoActiveIssue),
            "Error: No active issue. Please select an issue using 'select_issue' first."
        );
        assert_eq!(
            render_error(&BacklogError::TaskNotFound {
                id: "deadbeef".to_string(),
                issue: "Alpha".to_string()
            }),
            "Error: Task with ID 'deadbeef' not found in issue 'Alpha'."
        );
    }
}
