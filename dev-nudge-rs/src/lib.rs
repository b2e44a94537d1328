//! dev-nudge-rs: commit reminders and spoken completion notices for agent hooks.
//!
//! Two binaries share this library:
//! - `commit-reminder`: PostToolUse hook that nudges towards regular commits
//! - `tts-notify`: offline text-to-speech completion notice

pub mod commit_reminder;
pub mod config;
pub mod git_status;
pub mod hook;
pub mod speaker;
mod timestamp;
