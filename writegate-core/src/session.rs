//! The confirmation session: one approval prompt per requested write.
//!
//! [`SessionCore`] is the synchronous state machine. It owns the
//! [`SessionState`], the [`InputChannel`] and the output writer, and resolves
//! each request to exactly one [`Decision`].
//!
//! [`ConfirmationSession`] wraps it for async callers. The core sits behind a
//! `tokio::sync::Mutex`, so overlapping requests queue instead of
//! interleaving on the terminal, and each prompt runs on the blocking pool via
//! `spawn_blocking` so waiting on a human never ties up a runtime worker.
//!
//! # Failure policy
//!
//! Every failure path rejects. An unavailable input source, repeated
//! end-of-file reads, a read error, and cancellation all produce
//! `Decision::Rejected`; only a broken output stream or a panicked prompt
//! produces `Decision::Error`. Nothing but an explicit `yes` or `always`
//! (or sticky approve-all) ever yields `Decision::Approved`.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::command::help_text;
use crate::diff;
use crate::error::PromptFailure;
use crate::input::{InputChannel, Token};
use crate::render::{self, Palette, DEFAULT_CONTEXT, FULL_CONTEXT};
use crate::state::{SessionState, Step};
use crate::types::Decision;

/// Tunables for a session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// End-of-file reads in a row before the prompt gives up.
    pub max_empty_reads: u32,
    /// Pause between an end-of-file read and the next attempt.
    pub retry_delay: Duration,
    /// Diff colors, or `None` for plain text.
    pub palette: Option<Palette>,
    /// Printed when no input source is attached.
    pub unavailable_hint: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_empty_reads: 3,
            retry_delay: Duration::from_millis(100),
            palette: Some(Palette::default()),
            unavailable_hint: "Run again from an interactive terminal so the change can be \
                reviewed, or pre-approve changes explicitly to skip this prompt."
                .to_owned(),
        }
    }
}

/// One write awaiting approval.
///
/// `path` and `overwrite` are only displayed; the session never opens files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRequest {
    /// Target path, shown in the header.
    pub path: String,
    /// Whether the target already exists.
    pub overwrite: bool,
    /// Current content, `None` when the file does not exist.
    pub old: Option<String>,
    /// Proposed content, `None` when the file is to be deleted.
    pub new: Option<String>,
}

impl ApprovalRequest {
    /// Builds a request from borrowed parts.
    pub fn new(path: &str, overwrite: bool, old: Option<&str>, new: Option<&str>) -> Self {
        Self {
            path: path.to_owned(),
            overwrite,
            old: old.map(str::to_owned),
            new: new.map(str::to_owned),
        }
    }

    fn action(&self) -> &'static str {
        match (&self.new, self.overwrite) {
            (None, _) if self.old.is_none() => "review",
            (None, _) => "delete file",
            (Some(_), true) => "overwrite existing file",
            (Some(_), false) => "create new file",
        }
    }
}

/// Synchronous approval state machine.
pub struct SessionCore<C> {
    state: SessionState,
    channel: C,
    out: Box<dyn Write + Send>,
    settings: SessionSettings,
    cancel: Arc<AtomicBool>,
}

impl<C: InputChannel> SessionCore<C> {
    /// Creates a session with fresh state writing prompts to `out`.
    pub fn new(channel: C, out: Box<dyn Write + Send>, settings: SessionSettings) -> Self {
        Self {
            state: SessionState::default(),
            channel,
            out,
            settings,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replaces the initial state, e.g. with [`SessionState::approve_all`].
    pub fn with_state(mut self, state: SessionState) -> Self {
        self.state = state;
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Flag that, once set, makes the running prompt reject and return.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Resolves one request, blocking on the operator if needed.
    ///
    /// Sticky mode answers immediately without reading input or printing.
    pub fn request_blocking(&mut self, request: &ApprovalRequest) -> Decision {
        if let Some(decision) = self.state.sticky_decision() {
            debug!(path = %request.path, ?decision, "sticky decision");
            return decision;
        }
        let decision = match self.prompt(request) {
            Ok(decision) => decision,
            Err(e) => {
                warn!(error = %e, "approval prompt output failed");
                Decision::Error(format!("failed to write approval prompt: {e}"))
            }
        };
        info!(path = %request.path, ?decision, "approval resolved");
        decision
    }

    fn prompt(&mut self, request: &ApprovalRequest) -> io::Result<Decision> {
        if !self.input_available() {
            let failure = PromptFailure::InputUnavailable;
            info!(path = %request.path, "{failure}");
            writeln!(
                self.out,
                "Cannot ask for approval to {} {}: {failure}.",
                request.action(),
                request.path
            )?;
            writeln!(self.out, "{}", self.settings.unavailable_hint)?;
            self.out.flush()?;
            return Ok(Decision::rejected(failure.to_string()));
        }

        self.state = self.state.begin_prompt();
        let script = diff::compute(request.old.as_deref(), request.new.as_deref());
        self.write_header(request)?;
        self.write_diff(&render::render(&script, DEFAULT_CONTEXT))?;
        self.channel.present_menu(&mut *self.out)?;
        self.out.flush()?;

        loop {
            if self.cancel.load(Ordering::Relaxed) {
                return Ok(Decision::rejected("approval prompt was cancelled"));
            }
            match self.channel.read_token(&mut *self.out, &self.cancel) {
                Token::Failed(e) => {
                    let failure = PromptFailure::InputRead(e);
                    warn!("{failure}");
                    writeln!(self.out, "{failure}; rejecting the change.")?;
                    return Ok(Decision::rejected(failure.to_string()));
                }
                Token::Eof => {
                    let (state, decision) =
                        self.state.on_empty_read(self.settings.max_empty_reads);
                    self.state = state;
                    debug!(count = state.consecutive_empty_reads(), "empty read");
                    if let Some(decision) = decision {
                        if let Some(msg) = decision.message() {
                            writeln!(self.out, "{msg}; rejecting the change.")?;
                        }
                        return Ok(decision);
                    }
                    std::thread::sleep(self.settings.retry_delay);
                }
                Token::Command(command) => {
                    let (state, step) = self.state.on_command(command);
                    self.state = state;
                    debug!(?command, "command");
                    match step {
                        Step::Decide(decision) => return Ok(decision),
                        Step::ShowFullDiff => {
                            self.write_diff(&render::render(&script, FULL_CONTEXT))?;
                            self.channel.present_menu(&mut *self.out)?;
                        }
                        Step::ShowHelp => write!(self.out, "{}", help_text())?,
                    }
                }
                Token::Unrecognized(input) => {
                    self.state = self.state.on_unrecognized();
                    if input.is_empty() {
                        writeln!(self.out, "Please choose an option. Type ? for help.")?;
                    } else {
                        writeln!(self.out, "Unrecognized input {input:?}. Type ? for help.")?;
                    }
                }
            }
            self.out.flush()?;
        }
    }

    /// Probes input availability once per session.
    fn input_available(&mut self) -> bool {
        if let Some(available) = self.state.stdin_available() {
            return available;
        }
        let available = self.channel.probe_available();
        debug!(available, "probed input source");
        self.state = self.state.with_probe(available);
        available
    }

    fn write_header(&mut self, request: &ApprovalRequest) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Approval required: {} {}", request.action(), request.path)?;
        Ok(())
    }

    fn write_diff(&mut self, text: &str) -> io::Result<()> {
        match &self.settings.palette {
            Some(palette) => write!(self.out, "{}", render::colorize_with(text, palette)),
            None => write!(self.out, "{text}"),
        }
    }
}

/// Async, shareable handle over a [`SessionCore`].
///
/// Cloning yields another handle to the same session and state.
pub struct ConfirmationSession<C> {
    core: Arc<tokio::sync::Mutex<SessionCore<C>>>,
    cancel: Arc<AtomicBool>,
}

impl<C> Clone for ConfirmationSession<C> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            cancel: Arc::clone(&self.cancel),
        }
    }
}

impl<C: InputChannel + 'static> ConfirmationSession<C> {
    /// Creates a session with fresh state writing prompts to `out`.
    pub fn new(channel: C, out: Box<dyn Write + Send>, settings: SessionSettings) -> Self {
        Self::from_core(SessionCore::new(channel, out, settings))
    }

    /// Wraps an already configured core.
    pub fn from_core(core: SessionCore<C>) -> Self {
        let cancel = core.cancel_flag();
        Self {
            core: Arc::new(tokio::sync::Mutex::new(core)),
            cancel,
        }
    }

    /// Asks the operator whether `path` may be written.
    ///
    /// Waits for any prompt already running on this session, then runs the
    /// prompt on the blocking pool. Dropping the returned future cancels the
    /// prompt: the channel is told to stop and restore the terminal, and the
    /// next request still waits until it has.
    pub async fn request(
        &self,
        path: &str,
        overwrite: bool,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Decision {
        let request = ApprovalRequest::new(path, overwrite, old, new);
        let mut core = Arc::clone(&self.core).lock_owned().await;
        if let Some(decision) = core.state.sticky_decision() {
            debug!(path, ?decision, "sticky decision");
            return decision;
        }

        self.cancel.store(false, Ordering::Relaxed);
        let mut guard = CancelOnDrop {
            flag: Arc::clone(&self.cancel),
            armed: true,
        };
        let joined = tokio::task::spawn_blocking(move || core.request_blocking(&request)).await;
        guard.armed = false;

        match joined {
            Ok(decision) => decision,
            Err(e) => {
                warn!(error = %e, "approval prompt task failed");
                Decision::Error(format!("approval prompt failed: {e}"))
            }
        }
    }

    /// Snapshot of the session state, waiting for any running prompt.
    pub async fn state(&self) -> SessionState {
        self.core.lock().await.state()
    }

    /// Asks the running prompt, if any, to stop.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Raises the cancel flag if the request future is dropped mid-prompt.
struct CancelOnDrop {
    flag: Arc<AtomicBool>,
    armed: bool,
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(true, Ordering::Relaxed);
        }
    }
}
