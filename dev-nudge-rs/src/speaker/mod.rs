//! Offline spoken completion notices.
//!
//! Components:
//! - `tts`: eSpeak-family synthesis to WAV + rodio playback
//!
//! Synthesis needs an installed synthesizer binary, so callers check
//! [`detect`] before doing anything else.

use std::path::PathBuf;
use std::sync::LazyLock;

use rand::seq::SliceRandom;
use regex::Regex;
use thiserror::Error;

pub mod tts;

/// Synthesizer binaries tried in order.
pub const SYNTHESIZERS: &[&str] = &["espeak-ng", "espeak"];

/// Failure text that points at the audio stack rather than at us.
static ENVIRONMENT_FAILURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"eSpeak|ALSA|PulseAudio|JACK|(?i:audio)|(?i:no default output device)")
        .expect("valid environment failure pattern")
});

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("no offline speech synthesizer installed (looked for {})", SYNTHESIZERS.join(", "))]
    Unavailable,
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Synthesis {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("failed to create temporary audio file: {0}")]
    TempFile(#[source] std::io::Error),
    #[error("unreadable synthesizer output: {0}")]
    Decode(#[from] hound::Error),
    #[error("failed to open audio output: {0}")]
    Output(#[from] rodio::StreamError),
}

impl SpeechError {
    /// Whether the failure comes from a missing or broken audio environment
    /// (container, WSL, no sound card). Callers may fall back to another
    /// notification method in that case.
    pub fn is_environment_failure(&self) -> bool {
        let detail = match self {
            SpeechError::Unavailable => return false,
            SpeechError::Spawn { source, .. } => source.to_string(),
            SpeechError::Synthesis { stderr, .. } => stderr.clone(),
            SpeechError::TempFile(e) => e.to_string(),
            SpeechError::Decode(e) => e.to_string(),
            SpeechError::Output(_) => self.to_string(),
        };
        is_environment_message(&detail)
    }
}

pub fn is_environment_message(message: &str) -> bool {
    ENVIRONMENT_FAILURE.is_match(message)
}

/// Whether a synthesizer can be used on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Available(PathBuf),
    Unavailable,
}

/// Look up the first synthesizer on `PATH`.
pub fn detect() -> Capability {
    SYNTHESIZERS
        .iter()
        .find_map(|name| which::which(name).ok())
        .map_or(Capability::Unavailable, Capability::Available)
}

/// Text to speak: the joined arguments, or a random stock phrase.
pub fn choose_text(args: &[String], phrases: &[String]) -> String {
    if !args.is_empty() {
        return args.join(" ");
    }
    phrases
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_else(|| "All done!".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeechConfig;

    #[test]
    fn arguments_are_joined_with_spaces() {
        let args = vec!["Build".to_string(), "succeeded".to_string()];
        assert_eq!(choose_text(&args, &[]), "Build succeeded");
    }

    #[test]
    fn no_arguments_picks_a_stock_phrase() {
        let phrases = SpeechConfig::default().phrases;
        for _ in 0..20 {
            assert!(phrases.contains(&choose_text(&[], &phrases)));
        }
    }

    #[test]
    fn empty_phrase_list_still_yields_text() {
        assert_eq!(choose_text(&[], &[]), "All done!");
    }

    #[test]
    fn audio_driver_messages_are_environment_failures() {
        assert!(is_environment_message("ALSA lib pcm.c:2664: Unknown PCM default"));
        assert!(is_environment_message("eSpeak: could not open sound device"));
        assert!(is_environment_message("No Audio device found"));
        assert!(is_environment_message("Connection to PulseAudio refused"));
        assert!(!is_environment_message("voice 'xx' not found"));
        assert!(!is_environment_message("permission denied"));
    }

    #[test]
    fn synthesis_errors_are_classified_by_stderr() {
        let status = std::process::ExitStatus::default();
        let driver = SpeechError::Synthesis {
            program: "espeak-ng".into(),
            status,
            stderr: "ALSA lib confmisc.c: cannot find card '0'".into(),
        };
        let other = SpeechError::Synthesis {
            program: "espeak-ng".into(),
            status,
            stderr: "Failed to read voice 'zz'".into(),
        };
        assert!(driver.is_environment_failure());
        assert!(!other.is_environment_failure());
        assert!(!SpeechError::Unavailable.is_environment_failure());
    }
}
