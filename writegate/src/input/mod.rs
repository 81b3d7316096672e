//! Terminal input strategies.
//!
//! [`TerminalChannel`] is the channel the CLI hands to the session. On every
//! read it decides afresh between the raw-mode menu ([`rich`]) and line input
//! ([`plain`]). A rich attempt that fails falls back to line input for that
//! read only; the next read tries rich again.

pub mod plain;
pub mod probe;
pub mod rich;

use std::io::{self, BufRead, BufReader, IsTerminal, Stdin, Write};
use std::sync::atomic::AtomicBool;

use serde::Deserialize;
use tracing::debug;
use writegate_core::command::menu_line;
use writegate_core::{InputChannel, Token};

use self::plain::PlainChannel;
use self::rich::{MenuStrategy, RawMenu};

/// Which strategies the operator allows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Rich when both stdin and stderr are terminals, plain otherwise.
    #[default]
    Auto,
    /// Always try rich first.
    Rich,
    /// Never use raw mode.
    Plain,
}

/// Strategy picked for one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Rich,
    Plain,
}

/// Picks the strategy for one read.
pub fn detect(mode: InteractionMode, stdin_tty: bool, stderr_tty: bool) -> Strategy {
    match mode {
        InteractionMode::Plain => Strategy::Plain,
        InteractionMode::Rich => Strategy::Rich,
        InteractionMode::Auto if stdin_tty && stderr_tty => Strategy::Rich,
        InteractionMode::Auto => Strategy::Plain,
    }
}

/// Operator input from the process's stdin and terminal.
///
/// `M` runs the rich menu and `R` feeds line input; both default to the real
/// terminal and stdin.
pub struct TerminalChannel<M = RawMenu, R = BufReader<Stdin>> {
    mode: InteractionMode,
    menu: M,
    plain: PlainChannel<R>,
}

impl TerminalChannel {
    pub fn new(mode: InteractionMode) -> Self {
        Self::with_parts(mode, RawMenu, BufReader::new(std::io::stdin()))
    }
}

impl<M, R: BufRead> TerminalChannel<M, R> {
    pub fn with_parts(mode: InteractionMode, menu: M, reader: R) -> Self {
        Self {
            mode,
            menu,
            plain: PlainChannel::new(reader),
        }
    }

    fn strategy(&self) -> Strategy {
        detect(
            self.mode,
            std::io::stdin().is_terminal(),
            std::io::stderr().is_terminal(),
        )
    }
}

impl<M: MenuStrategy, R: BufRead + Send> InputChannel for TerminalChannel<M, R> {
    fn probe_available(&mut self) -> bool {
        probe::stdin_has_source()
    }

    /// The rich menu lists the commands itself, so only line input gets the
    /// one-line menu up front.
    fn present_menu(&mut self, out: &mut dyn Write) -> io::Result<()> {
        match self.strategy() {
            Strategy::Rich => Ok(()),
            Strategy::Plain => writeln!(out, "{}", menu_line()),
        }
    }

    fn read_token(&mut self, out: &mut dyn Write, cancel: &AtomicBool) -> Token {
        if self.strategy() == Strategy::Rich {
            match self.menu.read_choice(out, cancel) {
                Ok(token) => return token,
                Err(e) => {
                    debug!(error = %e, "menu unavailable, reading a line instead");
                    if let Err(e) = writeln!(out, "{}", menu_line()) {
                        return Token::Failed(e);
                    }
                }
            }
        }
        self.plain.read_token(out, cancel)
    }
}
