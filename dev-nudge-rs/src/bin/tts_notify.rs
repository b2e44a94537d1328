//! tts-notify: speak a short completion message with an offline synthesizer.
//!
//! Usage:
//! - `tts-notify`                    speaks a random stock phrase
//! - `tts-notify Build succeeded`    speaks "Build succeeded"
//!
//! Exits 0 when the audio stack is missing (container, WSL) so a caller can
//! fall back to another notification method.
//!
//! Every argument is text to speak, `-v` included; diagnostics are tuned
//! through `RUST_LOG` only.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dev_nudge::config::Config;
use dev_nudge::speaker::tts::EspeakTts;
use dev_nudge::speaker::{self, Capability, SpeechError};

#[derive(Parser, Debug)]
#[command(name = "tts-notify", about = "Offline text-to-speech completion notice")]
struct Args {
    /// Text to speak; words are joined with spaces
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    text: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    println!("🎙️  Offline TTS");
    println!("{}", "=".repeat(15));

    let program = match speaker::detect() {
        Capability::Available(program) => program,
        Capability::Unavailable => {
            println!("❌ Error: {}", SpeechError::Unavailable);
            println!("Install espeak-ng to enable spoken notifications.");
            return ExitCode::FAILURE;
        }
    };
    debug!("Using synthesizer {}", program.display());

    let config = Config::load(None).speech;
    let text = speaker::choose_text(&args.text, &config.phrases);
    println!("🎯 Text: {text}");
    println!("🔊 Speaking...");

    let tts = EspeakTts::new(program, &config);
    match tts.speak(&text) {
        Ok(result) => {
            debug!(
                "generate={}ms playback={}ms",
                result.generate.as_millis(),
                result.playback.as_millis()
            );
            println!("✅ Playback complete!");
            ExitCode::SUCCESS
        }
        Err(e) if e.is_environment_failure() => {
            debug!("Audio environment failure: {e}");
            println!("⚠️  Audio not available in this environment (Docker/WSL)");
            println!("💡 TTS will fall back to other notification methods");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("❌ Error: {e}");
            ExitCode::FAILURE
        }
    }
}
