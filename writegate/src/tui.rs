//! Terminal lifecycle management for writegate.
//!
//! Raw mode is only ever held for the duration of one interactive menu, through
//! [`RawModeGuard`]. Everything is drawn on stderr so stdout stays free for
//! whatever pipeline the caller is part of.
//!
//! Raw mode and the cursor are process-wide. The approval session serialises
//! prompts, so at most one guard exists at a time.

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use signal_hook::consts::SIGTERM;
use signal_hook::flag::register;
use std::io::stderr;
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

/// Holds the terminal in raw mode with the cursor hidden until dropped.
///
/// Dropping the guard restores cooked mode and shows the cursor again. This
/// covers every exit from the menu loop: a selection, an I/O error propagated
/// with `?`, cancellation, and unwinding from a panic.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// Enables raw mode and hides the cursor.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the terminal cannot be switched to raw mode (for
    /// example, when no terminal is attached). Nothing needs restoring then.
    pub fn acquire() -> std::io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self { _private: () };
        // From here on Drop undoes raw mode even if hiding the cursor fails.
        execute!(stderr(), Hide)?;
        Ok(guard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Restores cooked mode and shows the cursor.
///
/// Idempotent; safe to call when raw mode was never enabled.
///
/// # Errors
///
/// Returns `Err` if `disable_raw_mode` or writing the cursor sequence fails.
/// Callers on shutdown paths should ignore the error (best-effort only).
pub fn restore_terminal() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stderr(), Show)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic message.
///
/// Chains onto the previously installed hook so the default printer still runs.
/// Without it, a panic inside the menu would leave the shell in raw mode with
/// the cursor hidden.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Register a SIGTERM handler that sets an `AtomicBool` flag.
///
/// Returns an `Arc<AtomicBool>` that becomes `true` when the process receives
/// SIGTERM. The main loop polls it next to the running request.
///
/// # Errors
///
/// Returns `Err` if the OS refuses to register the handler.
pub fn register_sigterm() -> std::io::Result<Arc<AtomicBool>> {
    let term = Arc::new(AtomicBool::new(false));
    // The handler only performs an atomic store, which is async-signal-safe.
    register(SIGTERM, Arc::clone(&term))?;
    Ok(term)
}
