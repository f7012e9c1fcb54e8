//! Stdio transport: newline-delimited JSON requests.
//!
//! Each request line is `{"op": "<operation>", "params": {...}}`; each
//! response line is `{"result": "<legacy text>"}`. Malformed requests
//! produce an `Error: ...` result and the loop continues; EOF ends the
//! session. One session per process: the transport owns the [`Session`]
//! and hands it to every task-scoped call.

use std::io::{BufRead, Write};

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::format;
use crate::service::{BacklogService, Session};

fn default_status() -> String {
    "New".to_string()
}

/// A decoded request line.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", content = "params", rename_all = "snake_case")]
pub enum Request {
    CreateIssue {
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default = "default_status")]
        status: String,
    },
    ListIssues,
    SelectIssue {
        name: String,
    },
    InitializeIssue {
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default = "default_status")]
        status: String,
    },
    AddTask {
        title: String,
        #[serde(default)]
        description: String,
    },
    ListTasks {
        #[serde(default)]
        status: Option<String>,
    },
    UpdateTaskStatus {
        task_id: String,
        status: String,
    },
    UpdateIssueStatus {
        name: String,
        status: String,
    },
}

/// Route one request to the service and render the reply as legacy text.
pub fn dispatch(service: &BacklogService, session: &mut Session, request: Request) -> String {
    let result = match request {
        Request::CreateIssue {
            name,
            description,
            status,
        } => service.create_issue(session, &name, &description, &status),
        Request::ListIssues => service.list_issues(session),
        Request::SelectIssue { name } => service.select_issue(session, &name),
        Request::InitializeIssue {
            name,
            description,
            status,
        } => service.initialize_issue(session, &name, &description, &status),
        Request::AddTask { title, description } => service.add_task(session, &title, &description),
        Request::ListTasks { status } => service.list_tasks(session, status.as_deref()),
        Request::UpdateTaskStatus { task_id, status } => {
            service.update_task_status(session, &task_id, &status)
        }
        Request::UpdateIssueStatus { name, status } => {
            service.update_issue_status(&name, &status)
        }
    };

    match result {
        Ok(reply) => format::render(&reply),
        Err(e) => format::render_error(&e),
    }
}

/// Serve newline-delimited JSON requests until EOF.
///
/// # Errors
///
/// Returns an error only when the transport itself fails (broken pipe,
/// unreadable stdin); bad requests are answered, not raised.
pub fn serve(
    service: &BacklogService,
    reader: impl BufRead,
    mut writer: impl Write,
) -> std::io::Result<()> {
    let mut session = Session::new();

    for line in reader.lines() {
        let line = line?;
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }

        let text = match serde_json::from_str::<Request>(raw) {
            Ok(request) => {
                debug!(?request, "handling request");
                dispatch(service, &mut session, request)
            }
            Err(e) => format!("Error: Invalid request: {e}"),
        };

        let response = json!({ "result": text });
        writeln!(writer, "{response}")?;
        writer.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileStore;

    fn service() -> (BacklogService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("tasks.json"));
        (BacklogService::new(store), dir)
    }

    fn responses(svc: &BacklogService, input: &str) -> Vec<String> {
        let mut out = Vec::new();
        serve(svc, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| {
                let v: serde_json::Value = serde_json::from_str(line).unwrap();
                v["result"].as_str().unwrap().to_string()
            })
            .collect()
    }

    #[test]
    fn test_request_parsing_with_defaults() {
        let request: Request =
            serde_json::from_str(r#"{"op":"create_issue","params":{"name":"Alpha"}}"#).unwrap();
        match request {
            Request::CreateIssue {
                name,
                description,
                status,
            } => {
                assert_eq!(name, "Alpha");
                assert_eq!(description, "");
                assert_eq!(status, "New");
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_serve_session_flow() {
        let (svc, _dir) = service();
        let input = [
            r#"{"op":"create_issue","params":{"name":"Auth"}}"#,
            r#"{"op":"add_task","params":{"title":"Login flow"}}"#,
            r#"{"op":"list_tasks","params":{}}"#,
        ]
        .join("\n");

        let replies = responses(&svc, &input);
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0], "Successfully created issue: Auth with status: New");
        assert!(replies[1].starts_with("Successfully added task: Login flow (ID: "));
        assert!(replies[1].ends_with("to issue 'Auth'"));
        assert!(replies[2].starts_with("Tasks for issue: Auth"));
        assert!(replies[2].contains("Title: Login flow"));
    }

    #[test]
    fn test_serve_errors_share_the_result_channel() {
        let (svc, _dir) = service();
        let input = [
            r#"{"op":"add_task","params":{"title":"Orphan"}}"#,
            "not json at all",
            r#"{"op":"select_issue","params":{"name":"Missing"}}"#,
        ]
        .join("\n");

        let replies = responses(&svc, &input);
        assert_eq!(
            replies[0],
            "Error: No active issue. Please select an issue using 'select_issue' first."
        );
        assert!(replies[1].starts_with("Error: Invalid request:"));
        assert_eq!(replies[2], "Error: Issue 'Missing' not found.");
    }

    #[test]
    fn test_serve_skips_blank_lines() {
        let (svc, _dir) = service();
        let replies = responses(&svc, "\n\n{\"op\":\"list_issues\"}\n");
        assert_eq!(replies.len(), 1);
        assert_eq!(
            replies[0],
            "No issues found. Use 'create_issue' to create a new issue."
        );
    }
}
