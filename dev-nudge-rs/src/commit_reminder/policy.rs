//! Reminder predicates. Any one of them makes a reminder due; whether it is
//! actually shown is gated separately on the working tree having changes.

use chrono::{DateTime, TimeDelta, Utc};

use super::state::ReminderState;
use crate::config::ReminderConfig;
use crate::git_status::RepoStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Triggers {
    pub time: bool,
    pub tasks: bool,
    pub changes: bool,
}

impl Triggers {
    pub fn evaluate(
        config: &ReminderConfig,
        state: &ReminderState,
        status: Option<&RepoStatus>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            time: time_due(config, state, now),
            tasks: tasks_due(config, state),
            changes: status.is_some_and(|s| changes_due(config, s)),
        }
    }

    pub fn any(&self) -> bool {
        self.time || self.tasks || self.changes
    }
}

/// True before the first reminder, then once per `interval_minutes`.
pub fn time_due(config: &ReminderConfig, state: &ReminderState, now: DateTime<Utc>) -> bool {
    match state.last_reminder_time {
        None => true,
        Some(last) => TimeDelta::try_minutes(config.interval_minutes)
            .is_some_and(|interval| now - last >= interval),
    }
}

pub fn tasks_due(config: &ReminderConfig, state: &ReminderState) -> bool {
    config.task_completion_reminder && state.tasks_completed > 0
}

pub fn changes_due(config: &ReminderConfig, status: &RepoStatus) -> bool {
    status.has_changes() && status.total_changes() >= config.max_files_changed
}

/// A due reminder is only shown when there is something to commit.
pub fn should_emit(triggers: Triggers, status: Option<&RepoStatus>) -> bool {
    triggers.any() && status.is_some_and(RepoStatus::has_changes)
}
