//! Session state and its transitions.
//!
//! [`SessionState`] is a small `Copy` value. Every change to it goes through a
//! pure function that takes the old state and an input and returns the new
//! state plus what the prompt loop should do next. The prompt loop is the only
//! caller that stores the result.

use crate::command::Command;
use crate::error::PromptFailure;
use crate::types::Decision;

/// Session-wide decision that suppresses further prompting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sticky {
    /// Every later request is approved.
    Approve,
    /// Every later request is rejected.
    Deny,
}

/// What the prompt loop does after a command has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The request is resolved.
    Decide(Decision),
    /// Print the untruncated diff and keep prompting.
    ShowFullDiff,
    /// Print the command reference and keep prompting.
    ShowHelp,
}

/// Mutable state carried across requests of one session.
///
/// Approve-all and deny-all are one optional value, so they can never both be
/// set. Once set, sticky mode is never cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    sticky: Option<Sticky>,
    stdin_available: Option<bool>,
    consecutive_empty_reads: u32,
}

impl SessionState {
    /// State with approve-all already set; every request is approved unseen.
    pub fn approve_all() -> Self {
        Self {
            sticky: Some(Sticky::Approve),
            ..Self::default()
        }
    }

    /// Returns `true` once `always` has been chosen.
    pub fn always_approve(&self) -> bool {
        self.sticky == Some(Sticky::Approve)
    }

    /// Returns `true` once `deny` has been chosen.
    pub fn always_deny(&self) -> bool {
        self.sticky == Some(Sticky::Deny)
    }

    /// Cached result of the input availability probe, if it has run.
    pub fn stdin_available(&self) -> Option<bool> {
        self.stdin_available
    }

    /// Number of end-of-file reads in a row during the current prompt.
    pub fn consecutive_empty_reads(&self) -> u32 {
        self.consecutive_empty_reads
    }

    /// The decision sticky mode forces, if any.
    pub fn sticky_decision(&self) -> Option<Decision> {
        match self.sticky {
            Some(Sticky::Approve) => Some(Decision::Approved),
            Some(Sticky::Deny) => Some(Decision::Rejected(Some(
                "all changes are being denied for this session".to_owned(),
            ))),
            None => None,
        }
    }

    /// Records the probe result. A cached result is never overwritten.
    pub fn with_probe(self, available: bool) -> Self {
        Self {
            stdin_available: self.stdin_available.or(Some(available)),
            ..self
        }
    }

    /// Starts a fresh prompt: the empty-read count only spans one prompt.
    pub fn begin_prompt(self) -> Self {
        Self {
            consecutive_empty_reads: 0,
            ..self
        }
    }

    /// Applies a recognized command.
    ///
    /// Resets the empty-read counter. `always` and `deny` set sticky mode
    /// unless it is already set, in which case the earlier choice stands.
    pub fn on_command(self, command: Command) -> (Self, Step) {
        let state = Self {
            consecutive_empty_reads: 0,
            ..self
        };
        match command {
            Command::Yes => (state, Step::Decide(Decision::Approved)),
            Command::No => (state, Step::Decide(Decision::Rejected(None))),
            Command::Always => (
                state.set_sticky(Sticky::Approve),
                Step::Decide(Decision::Approved),
            ),
            Command::Deny => (
                state.set_sticky(Sticky::Deny),
                Step::Decide(Decision::Rejected(None)),
            ),
            Command::View => (state, Step::ShowFullDiff),
            Command::Help => (state, Step::ShowHelp),
        }
    }

    /// Applies a non-empty read that matched no command. Only the empty-read
    /// counter changes.
    pub fn on_unrecognized(self) -> Self {
        Self {
            consecutive_empty_reads: 0,
            ..self
        }
    }

    /// Applies an end-of-file read.
    ///
    /// Returns a rejection once `limit` empty reads have happened in a row;
    /// otherwise the caller should wait briefly and read again.
    pub fn on_empty_read(self, limit: u32) -> (Self, Option<Decision>) {
        let count = self.consecutive_empty_reads.saturating_add(1);
        let state = Self {
            consecutive_empty_reads: count,
            ..self
        };
        if count >= limit {
            let failure = PromptFailure::InputExhausted { attempts: count };
            (state, Some(Decision::rejected(failure.to_string())))
        } else {
            (state, None)
        }
    }

    fn set_sticky(self, sticky: Sticky) -> Self {
        Self {
            sticky: self.sticky.or(Some(sticky)),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_and_no_decide_without_sticky() {
        let (s, step) = SessionState::default().on_command(Command::Yes);
        assert_eq!(step, Step::Decide(Decision::Approved));
        assert_eq!(s.sticky_decision(), None);

        let (s, step) = s.on_command(Command::No);
        assert_eq!(step, Step::Decide(Decision::Rejected(None)));
        assert_eq!(s.sticky_decision(), None);
    }

    #[test]
    fn always_sets_sticky_approve() {
        let (s, step) = SessionState::default().on_command(Command::Always);
        assert_eq!(step, Step::Decide(Decision::Approved));
        assert!(s.always_approve());
        assert!(!s.always_deny());
        assert_eq!(s.sticky_decision(), Some(Decision::Approved));
    }

    #[test]
    fn deny_sets_sticky_deny() {
        let (s, step) = SessionState::default().on_command(Command::Deny);
        assert_eq!(step, Step::Decide(Decision::Rejected(None)));
        assert!(s.always_deny());
        assert!(matches!(s.sticky_decision(), Some(Decision::Rejected(_))));
    }

    #[test]
    fn sticky_flags_are_exclusive_and_permanent() {
        let (s, _) = SessionState::default().on_command(Command::Always);
        let (s, _) = s.on_command(Command::Deny);
        assert!(s.always_approve());
        assert!(!s.always_deny());
    }

    #[test]
    fn view_and_help_keep_prompting() {
        let (_, step) = SessionState::default().on_command(Command::View);
        assert_eq!(step, Step::ShowFullDiff);
        let (_, step) = SessionState::default().on_command(Command::Help);
        assert_eq!(step, Step::ShowHelp);
    }

    #[test]
    fn empty_reads_reject_at_limit_and_reset_on_command() {
        let s = SessionState::default();
        let (s, d) = s.on_empty_read(3);
        assert_eq!(d, None);
        let (s, d) = s.on_empty_read(3);
        assert_eq!(d, None);
        assert_eq!(s.consecutive_empty_reads(), 2);

        let (s, _) = s.on_command(Command::Help);
        assert_eq!(s.consecutive_empty_reads(), 0);

        let (s, _) = s.on_empty_read(3);
        let (s, _) = s.on_empty_read(3);
        let (s, d) = s.on_empty_read(3);
        assert_eq!(s.consecutive_empty_reads(), 3);
        assert_eq!(d, Some(Decision::rejected("no input after 3 attempts")));
    }

    #[test]
    fn unrecognized_input_breaks_an_empty_read_streak() {
        let (s, _) = SessionState::default().on_empty_read(3);
        let (s, _) = s.on_empty_read(3);
        let s = s.on_unrecognized();
        let (_, d) = s.on_empty_read(3);
        assert_eq!(d, None);
    }

    #[test]
    fn probe_result_is_cached_once() {
        let s = SessionState::default().with_probe(false);
        assert_eq!(s.stdin_available(), Some(false));
        assert_eq!(s.with_probe(true).stdin_available(), Some(false));
    }
}
