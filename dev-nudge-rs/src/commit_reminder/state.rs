//! Persisted reminder counters, one record per working directory.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::HookError;
use crate::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderState {
    #[serde(with = "timestamp::option")]
    pub last_reminder_time: Option<DateTime<Utc>>,
    #[serde(with = "timestamp::option")]
    pub last_commit_time: Option<DateTime<Utc>>,
    pub tasks_completed: u64,
    #[serde(with = "timestamp")]
    pub session_start_time: DateTime<Utc>,
    pub total_reminders_sent: u64,
}

/// On-disk form; also accepts the older key names. A missing session start
/// is filled in from the caller's clock.
#[derive(Deserialize)]
struct StoredState {
    #[serde(default, alias = "last_commit_reminder", with = "timestamp::option")]
    last_reminder_time: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    last_commit_time: Option<DateTime<Utc>>,
    #[serde(default)]
    tasks_completed: u64,
    #[serde(default, alias = "session_start", with = "timestamp::option")]
    session_start_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "reminders_sent")]
    total_reminders_sent: u64,
}

impl StoredState {
    fn into_state(self, now: DateTime<Utc>) -> ReminderState {
        ReminderState {
            last_reminder_time: self.last_reminder_time,
            last_commit_time: self.last_commit_time,
            tasks_completed: self.tasks_completed,
            session_start_time: self.session_start_time.unwrap_or(now),
            total_reminders_sent: self.total_reminders_sent,
        }
    }
}

impl ReminderState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_reminder_time: None,
            last_commit_time: None,
            tasks_completed: 0,
            session_start_time: now,
            total_reminders_sent: 0,
        }
    }

    /// Load state from `path`, starting fresh if the file is missing or corrupt.
    pub fn load(path: &Path, now: DateTime<Utc>) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => {
                debug!("No reminder state at {}, starting fresh", path.display());
                return Self::new(now);
            }
        };
        match serde_json::from_str::<StoredState>(&contents) {
            Ok(stored) => stored.into_state(now),
            Err(e) => {
                warn!("Discarding unreadable state {}: {e}", path.display());
                Self::new(now)
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), HookError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| HookError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| HookError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn record_task_completion(&mut self) {
        self.tasks_completed += 1;
    }

    /// Bookkeeping after a reminder was shown.
    pub fn record_reminder(&mut self, now: DateTime<Utc>, last_commit: Option<DateTime<Utc>>) {
        self.last_reminder_time = Some(now);
        self.total_reminders_sent += 1;
        self.tasks_completed = 0;
        if last_commit.is_some() {
            self.last_commit_time = last_commit;
        }
    }
}

/// Advisory exclusive lock around the state read-modify-write cycle.
/// Released when dropped.
pub struct StateLock {
    file: File,
    path: PathBuf,
}

impl StateLock {
    pub fn acquire(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;
        FileExt::lock_exclusive(&file)?;
        debug!("Locked {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to unlock {}: {e}", self.path.display());
        }
    }
}
