//! Configuration management for dev-nudge-rs.
//!
//! Loads config from YAML files in standard locations. Every field has a
//! default, so an absent or partial file still yields a usable config.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Minutes between time-based reminders.
    pub interval_minutes: i64,
    /// Fire a reminder once any task has been completed since the last one.
    pub task_completion_reminder: bool,
    /// Changed-file count that triggers a changes-based reminder.
    pub max_files_changed: usize,
    /// Tool names that count as a completed task.
    pub mutation_tools: Vec<String>,
    /// Entries kept in the execution log.
    pub log_limit: usize,
    /// Directory (relative to the working directory) for state and logs.
    pub log_dir: PathBuf,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 30,
            task_completion_reminder: true,
            max_files_changed: 3,
            mutation_tools: vec![
                "Write".into(),
                "Edit".into(),
                "MultiEdit".into(),
                "TodoWrite".into(),
            ],
            log_limit: 100,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl ReminderConfig {
    pub fn is_mutation_tool(&self, tool_name: &str) -> bool {
        self.mutation_tools.iter().any(|t| t == tool_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Speech rate in words per minute.
    pub rate_wpm: u32,
    /// Playback volume, 0.0 to 1.0.
    pub volume: f32,
    /// Synthesizer voice name; the synthesizer default when unset.
    pub voice: Option<String>,
    /// Phrases picked from when no text is given.
    pub phrases: Vec<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate_wpm: 180,
            volume: 0.8,
            voice: None,
            phrases: vec![
                "Work complete!".into(),
                "All done!".into(),
                "Task finished!".into(),
                "Job complete!".into(),
                "Ready for next task!".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reminder: ReminderConfig,
    pub speech: SpeechConfig,
}

impl Config {
    /// Load configuration from YAML file.
    ///
    /// Searches standard locations if no path is provided:
    /// 1. ./dev-nudge.yaml
    /// 2. ~/.config/dev-nudge/config.yaml
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path.map(PathBuf::from).or_else(|| {
            let candidates = [
                std::env::current_dir().ok().map(|d| d.join("dev-nudge.yaml")),
                dirs::config_dir().map(|c| c.join("dev-nudge/config.yaml")),
            ];
            candidates.into_iter().flatten().find(|p| p.exists())
        });

        let Some(config_path) = resolved else {
            debug!("No config file found, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                warn!("Failed to parse {}: {e}, using defaults", config_path.display());
                Self::default()
            }),
            Err(e) => {
                warn!("Failed to read {}: {e}, using defaults", config_path.display());
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = Config::default();
        assert_eq!(config.reminder.interval_minutes, 30);
        assert_eq!(config.reminder.max_files_changed, 3);
        assert!(config.reminder.task_completion_reminder);
        assert_eq!(config.reminder.log_limit, 100);
        assert_eq!(config.speech.rate_wpm, 180);
        assert!((config.speech.volume - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.speech.phrases.len(), 5);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = Config::parse("reminder:\n  interval_minutes: 5\n").unwrap();
        assert_eq!(config.reminder.interval_minutes, 5);
        assert_eq!(config.reminder.max_files_changed, 3);
        assert_eq!(config.speech.rate_wpm, 180);
    }

    #[test]
    fn mutation_tools_are_matched_exactly() {
        let reminder = ReminderConfig::default();
        assert!(reminder.is_mutation_tool("MultiEdit"));
        assert!(reminder.is_mutation_tool("TodoWrite"));
        assert!(!reminder.is_mutation_tool("Read"));
        assert!(!reminder.is_mutation_tool("write"));
    }

    #[test]
    fn missing_explicit_path_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.yaml")));
        assert_eq!(config.reminder.interval_minutes, 30);
    }
}
