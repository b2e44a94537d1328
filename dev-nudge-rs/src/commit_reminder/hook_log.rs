//! Execution and error logs, stored as JSON arrays under the log directory.
//!
//! The execution log keeps only the most recent entries; the error log grows
//! without bound.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::HookError;
use crate::timestamp;

/// One hook invocation, as recorded in the execution log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub hook_data: Value,
    pub reminder_sent: bool,
    #[serde(alias = "git_available")]
    pub status_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub error: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ErrorRecord {
    pub fn new(timestamp: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            timestamp,
            error: error.into(),
            kind: "commit_reminder_error".into(),
        }
    }
}

/// Read a JSON array log. Missing or malformed files read as empty.
fn load_entries(path: &Path) -> Vec<Value> {
    let Ok(contents) = fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<Value>>(&contents) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Starting over malformed log {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Append `entry`, keeping at most `limit` entries (oldest dropped first).
pub fn append<T: Serialize>(
    path: &Path,
    entry: &T,
    limit: Option<usize>,
) -> Result<(), HookError> {
    let encode = |source: serde_json::Error| HookError::Encode {
        path: path.to_path_buf(),
        source,
    };

    let mut entries = load_entries(path);
    entries.push(serde_json::to_value(entry).map_err(encode)?);
    if let Some(limit) = limit {
        if entries.len() > limit {
            let excess = entries.len() - limit;
            entries.drain(..excess);
        }
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| HookError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(&entries).map_err(encode)?;
    fs::write(path, json).map_err(|source| HookError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Load execution records, skipping entries that do not parse.
pub fn load_executions(path: &Path) -> Vec<ExecutionRecord> {
    load_entries(path)
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(i: i64) -> ExecutionRecord {
        ExecutionRecord {
            timestamp: Utc.timestamp_opt(i, 0).unwrap(),
            hook_data: json!({ "tool_name": "Write", "seq": i }),
            reminder_sent: i % 2 == 0,
            status_available: true,
        }
    }

    #[test]
    fn bounded_log_keeps_newest_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/commit_reminder.json");
        for i in 0..130 {
            append(&path, &record(i), Some(100)).unwrap();
        }

        let records = load_executions(&path);
        assert_eq!(records.len(), 100);
        assert_eq!(records[0].hook_data["seq"], json!(30));
        assert_eq!(records[99].hook_data["seq"], json!(129));
    }

    #[test]
    fn unbounded_log_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hook_errors.json");
        for i in 0..120 {
            append(&path, &ErrorRecord::new(Utc.timestamp_opt(i, 0).unwrap(), "boom"), None)
                .unwrap();
        }
        let contents: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(contents.len(), 120);
        assert_eq!(contents[0]["type"], json!("commit_reminder_error"));
    }

    #[test]
    fn malformed_log_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commit_reminder.json");
        fs::write(&path, "{\"not\": \"an array\"}").unwrap();
        append(&path, &record(1), Some(100)).unwrap();
        assert_eq!(load_executions(&path).len(), 1);
    }

    #[test]
    fn legacy_git_available_key_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commit_reminder.json");
        fs::write(
            &path,
            r#"[{"timestamp": 1700000000.0, "hook_data": {},
                "reminder_sent": false, "git_available": true}]"#,
        )
        .unwrap();
        let records = load_executions(&path);
        assert_eq!(records.len(), 1);
        assert!(records[0].status_available);
    }
}
