//! Commit Reminder: nudges to commit after time, tasks, or accumulated changes.
//!
//! Components:
//! - `state`: persisted per-directory counters plus the advisory state lock
//! - `policy`: the three reminder predicates
//! - `message`: reminder text composition
//! - `hook_log`: bounded execution log and unbounded error log
//! - `engine`: one hook invocation, end to end
//! - `report`: `--show-state` summary

use std::path::PathBuf;

use thiserror::Error;

pub mod engine;
pub mod hook_log;
pub mod message;
pub mod policy;
pub mod report;
pub mod state;

pub use engine::{Outcome, ReminderEngine};

#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to read hook input: {0}")]
    Input(#[source] std::io::Error),
    #[error("invalid hook payload: {0}")]
    Payload(#[source] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
