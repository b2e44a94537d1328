//! Markdown summary of reminder state and recent hook activity.

use std::path::Path;

use chrono::{DateTime, Local, Utc};

use super::engine::ReminderPaths;
use super::hook_log::{self, ExecutionRecord};
use super::state::ReminderState;
use crate::git_status::is_repository;

fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "never".to_string(),
    }
}

/// Render the summary printed by `commit-reminder --show-state`.
pub fn generate_report(workdir: &Path, paths: &ReminderPaths, now: DateTime<Utc>) -> String {
    let state_exists = paths.state.exists();
    let state = ReminderState::load(&paths.state, now);
    let records = hook_log::load_executions(&paths.execution_log);
    render(
        workdir,
        is_repository(workdir),
        state_exists.then_some(&state),
        &records,
    )
}

fn render(
    workdir: &Path,
    is_repo: bool,
    state: Option<&ReminderState>,
    records: &[ExecutionRecord],
) -> String {
    let mut lines = vec![
        format!("# Commit Reminder - {}", workdir.display()),
        String::new(),
        format!("- **Git repository**: {}", if is_repo { "yes" } else { "no" }),
        String::new(),
        "## State".to_string(),
    ];

    match state {
        Some(state) => lines.extend([
            format!("- **Session started**: {}", format_time(Some(state.session_start_time))),
            format!("- **Last reminder**: {}", format_time(state.last_reminder_time)),
            format!("- **Last commit seen**: {}", format_time(state.last_commit_time)),
            format!("- **Tasks since last reminder**: {}", state.tasks_completed),
            format!("- **Reminders sent**: {}", state.total_reminders_sent),
        ]),
        None => lines.push("No reminder state recorded.".to_string()),
    }

    lines.extend([String::new(), "## Execution Log".to_string()]);
    if records.is_empty() {
        lines.push("No hook executions recorded.".to_string());
        return lines.join("\n");
    }

    let reminders = records.iter().filter(|r| r.reminder_sent).count();
    let with_status = records.iter().filter(|r| r.status_available).count();
    lines.extend([
        format!("- **Invocations logged**: {}", records.len()),
        format!("- **Reminders in log**: {reminders}"),
        format!("- **Git status available**: {with_status}/{}", records.len()),
    ]);
    if let Some(last) = records.last() {
        lines.push(format!("- **Last invocation**: {}", format_time(Some(last.timestamp))));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn empty_directory_reports_nothing_recorded() {
        let report = render(Path::new("/work"), false, None, &[]);
        assert!(report.contains("- **Git repository**: no"));
        assert!(report.starts_with("# Commit Reminder - /work"));
        assert!(report.contains("No reminder state recorded."));
        assert!(report.contains("No hook executions recorded."));
    }

    #[test]
    fn counts_reminders_and_status_availability() {
        let mut state = ReminderState::new(Utc.timestamp_opt(0, 0).unwrap());
        state.tasks_completed = 2;
        state.total_reminders_sent = 4;
        let records: Vec<ExecutionRecord> = (0..3)
            .map(|i| ExecutionRecord {
                timestamp: Utc.timestamp_opt(i, 0).unwrap(),
                hook_data: json!({}),
                reminder_sent: i == 0,
                status_available: i != 2,
            })
            .collect();

        let report = render(Path::new("/work"), true, Some(&state), &records);
        assert!(report.contains("- **Tasks since last reminder**: 2"));
        assert!(report.contains("- **Reminders sent**: 4"));
        assert!(report.contains("- **Last reminder**: never"));
        assert!(report.contains("- **Invocations logged**: 3"));
        assert!(report.contains("- **Reminders in log**: 1"));
        assert!(report.contains("- **Git status available**: 2/3"));
    }
}
