//! writegate: review proposed file changes as diffs and apply only the
//! approved ones.
//!
//! # Startup sequence
//!
//! 1. Parse arguments, then install the tracing subscriber on stderr.
//! 2. Load the config. Failures here are soft and fall back to defaults.
//! 3. `install_panic_hook()` so a panic inside a raw-mode prompt still
//!    restores the terminal before the message prints.
//! 4. `register_sigterm()`. The flag is polled next to the running review.
//! 5. Build the session over [`input::TerminalChannel`] and walk the changes.
//!
//! Exit status is 0 when every change was applied, 1 when any was rejected,
//! 2 on errors and 143 after SIGTERM.

mod apply;
mod cli;
mod config;
mod error;
mod input;
mod theme;
mod tui;

use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use writegate_core::{ConfirmationSession, SessionCore, SessionState};

use crate::apply::Outcome;
use crate::cli::Cli;
use crate::error::AppError;
use crate::input::TerminalChannel;

/// How often the main task checks the SIGTERM flag while a prompt is open.
const TERM_POLL: Duration = Duration::from_millis(50);

/// How long shutdown waits for a prompt thread stuck in a blocking read.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

const UNAVAILABLE_HINT: &str =
    "Run writegate from an interactive terminal, or pass --yes to approve every change.";

fn init_tracing() {
    let filter = EnvFilter::try_from_env("WRITEGATE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => return report(AppError::Startup(e)),
    };
    let result = runtime.block_on(run(cli));
    // A prompt thread may still sit in a blocking stdin read; do not wait on it.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    match result {
        Ok(outcome) if outcome.all_applied() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => report(e),
    }
}

fn report(e: AppError) -> ExitCode {
    if let AppError::Terminated = e {
        eprintln!("writegate: {e}");
        return ExitCode::from(143);
    }
    error!(error = %e, "run failed");
    eprintln!("writegate: {e}");
    ExitCode::from(2)
}

async fn run(cli: Cli) -> Result<Outcome, AppError> {
    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let config = config::load(&config_path);
    debug!(path = %config_path.display(), ?config, "config loaded");

    let changes = cli.changes();
    if changes.is_empty() {
        return Err(AppError::NoChanges);
    }

    tui::install_panic_hook();
    let term = tui::register_sigterm().map_err(AppError::Startup)?;

    let mode = cli.interaction.unwrap_or(config.interaction);
    let color = !cli.no_color
        && std::io::stderr().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();
    let settings = config.session_settings(color, UNAVAILABLE_HINT);

    let mut core = SessionCore::new(
        TerminalChannel::new(mode),
        Box::new(std::io::stderr()),
        settings,
    );
    if cli.yes {
        core = core.with_state(SessionState::approve_all());
    }
    let session = ConfirmationSession::from_core(core);

    let review = apply::apply_all(&session, &changes);
    tokio::pin!(review);
    let mut heartbeat = tokio::time::interval(TERM_POLL);
    loop {
        tokio::select! {
            result = &mut review => return result,
            _ = heartbeat.tick() => {
                if term.load(Ordering::Relaxed) {
                    session.cancel();
                    if let Err(e) = tui::restore_terminal() {
                        debug!(error = %e, "terminal restore after SIGTERM failed");
                    }
                    return Err(AppError::Terminated);
                }
            }
        }
    }
}
