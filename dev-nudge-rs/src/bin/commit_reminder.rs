//! commit-reminder: agent hook binary nudging the user to commit.
//!
//! Reads the hook event JSON from stdin and prints a reminder on stderr when
//! one is due. Always exits 0: a broken reminder must never block the
//! calling tool-chain, so failures go to logs/hook_errors.json instead.
//!
//! stderr belongs to the reminder, so diagnostics stay off unless `-v` or
//! `RUST_LOG` asks for them.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use dev_nudge::commit_reminder::{report, HookError, ReminderEngine};
use dev_nudge::config::Config;
use dev_nudge::git_status::{GitStatusProvider, StatusProvider};
use dev_nudge::hook::HookPayload;

#[derive(Parser, Debug, Default)]
#[command(name = "commit-reminder", about = "Git commit reminder hook")]
struct Args {
    /// Path to config YAML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the reminder state for this directory instead of reading a hook event
    #[arg(long)]
    show_state: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            Args::default()
        }
        Err(e) => e.exit(),
    };

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Ok(workdir) = std::env::current_dir() else {
        warn!("No working directory, skipping commit reminder");
        return ExitCode::SUCCESS;
    };

    let config = Config::load(args.config.as_deref());
    let provider = GitStatusProvider::new(&workdir).excluding(&config.reminder.log_dir);
    let engine = ReminderEngine::new(config.reminder, &workdir, provider);

    if args.show_state {
        println!("{}", report::generate_report(&workdir, engine.paths(), Utc::now()));
        return ExitCode::SUCCESS;
    }

    let now = Utc::now();
    if let Err(e) = run(&engine, now) {
        warn!("Commit reminder failed: {e}");
        engine.log_error(&e, now);
    }

    ExitCode::SUCCESS
}

fn run<P: StatusProvider>(
    engine: &ReminderEngine<P>,
    now: chrono::DateTime<Utc>,
) -> Result<(), HookError> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(HookError::Input)?;
    let payload = HookPayload::parse(&input).map_err(HookError::Payload)?;

    let outcome = engine.process(&payload, now)?;
    if let Some(reminder) = &outcome.reminder {
        eprintln!("{reminder}");
    }

    engine.log_execution(&payload, &outcome, now);
    Ok(())
}
