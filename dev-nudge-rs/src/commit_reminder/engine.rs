//! One hook invocation: status query, trigger evaluation, state update.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::hook_log::{self, ErrorRecord, ExecutionRecord};
use super::policy::{self, Triggers};
use super::state::{ReminderState, StateLock};
use super::{message, HookError};
use crate::config::ReminderConfig;
use crate::git_status::StatusProvider;
use crate::hook::HookPayload;

const STATE_FILE: &str = "commit_reminder_state.json";
const LOCK_FILE: &str = "commit_reminder.lock";
const EXECUTION_LOG: &str = "commit_reminder.json";
const ERROR_LOG: &str = "hook_errors.json";

/// Locations of the reminder's files for one working directory.
#[derive(Debug, Clone)]
pub struct ReminderPaths {
    pub log_dir: PathBuf,
    pub state: PathBuf,
    pub lock: PathBuf,
    pub execution_log: PathBuf,
    pub error_log: PathBuf,
}

impl ReminderPaths {
    pub fn new(workdir: &Path, config: &ReminderConfig) -> Self {
        let log_dir = workdir.join(&config.log_dir);
        Self {
            state: log_dir.join(STATE_FILE),
            lock: log_dir.join(LOCK_FILE),
            execution_log: log_dir.join(EXECUTION_LOG),
            error_log: log_dir.join(ERROR_LOG),
            log_dir,
        }
    }
}

/// Result of processing one hook event.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub reminder: Option<String>,
    pub status_available: bool,
}

pub struct ReminderEngine<P> {
    config: ReminderConfig,
    paths: ReminderPaths,
    provider: P,
}

impl<P: StatusProvider> ReminderEngine<P> {
    pub fn new(config: ReminderConfig, workdir: &Path, provider: P) -> Self {
        let paths = ReminderPaths::new(workdir, &config);
        Self {
            config,
            paths,
            provider,
        }
    }

    pub fn paths(&self) -> &ReminderPaths {
        &self.paths
    }

    /// Decide whether to remind for this event and persist the new state.
    ///
    /// State is written at most once: either after a reminder or after a
    /// mutation tool bumped the task counter.
    pub fn process(
        &self,
        payload: &HookPayload,
        now: DateTime<Utc>,
    ) -> Result<Outcome, HookError> {
        fs::create_dir_all(&self.paths.log_dir).map_err(|source| HookError::Write {
            path: self.paths.log_dir.clone(),
            source,
        })?;

        let _lock = match StateLock::acquire(&self.paths.lock) {
            Ok(lock) => Some(lock),
            Err(e) => {
                warn!("Proceeding without state lock: {e}");
                None
            }
        };

        let mut state = ReminderState::load(&self.paths.state, now);
        let status = match self.provider.status() {
            Ok(status) => Some(status),
            Err(e) => {
                debug!("No working tree status: {e}");
                None
            }
        };

        let triggers = Triggers::evaluate(&self.config, &state, status.as_ref(), now);
        debug!("Triggers: {triggers:?}");

        if let Some(status) = status
            .as_ref()
            .filter(|s| policy::should_emit(triggers, Some(*s)))
        {
            let text = message::compose(triggers.time, &state, status, now);
            state.record_reminder(now, status.last_commit_time);
            state.save(&self.paths.state)?;
            info!(
                "Commit reminder #{} sent ({} changes)",
                state.total_reminders_sent,
                status.total_changes()
            );
            return Ok(Outcome {
                reminder: Some(text),
                status_available: true,
            });
        }

        if payload
            .tool_name()
            .is_some_and(|tool| self.config.is_mutation_tool(tool))
        {
            state.record_task_completion();
            state.save(&self.paths.state)?;
            debug!("Tasks completed since last reminder: {}", state.tasks_completed);
        }

        Ok(Outcome {
            reminder: None,
            status_available: status.is_some(),
        })
    }

    /// Append the invocation to the bounded execution log. Never fails the hook.
    pub fn log_execution(&self, payload: &HookPayload, outcome: &Outcome, now: DateTime<Utc>) {
        let record = ExecutionRecord {
            timestamp: now,
            hook_data: payload.to_value(),
            reminder_sent: outcome.reminder.is_some(),
            status_available: outcome.status_available,
        };
        if let Err(e) = hook_log::append(
            &self.paths.execution_log,
            &record,
            Some(self.config.log_limit),
        ) {
            warn!("Failed to write execution log: {e}");
        }
    }

    /// Best-effort append to the error log.
    pub fn log_error(&self, error: &HookError, now: DateTime<Utc>) {
        let record = ErrorRecord::new(now, error.to_string());
        if let Err(e) = hook_log::append(&self.paths.error_log, &record, None) {
            debug!("Failed to write error log: {e}");
        }
    }
}
