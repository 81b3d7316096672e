//! Input acquisition seam.
//!
//! The session never touches stdin or the terminal directly. It asks an
//! [`InputChannel`] for one [`Token`] at a time; concrete channels (line-based,
//! raw-mode menu, scripted test doubles) live with their callers.

use std::io::{self, Write};
use std::sync::atomic::AtomicBool;

use crate::command::{menu_line, Command};

/// One read from the operator.
#[derive(Debug)]
pub enum Token {
    /// A recognized command.
    Command(Command),
    /// Input that matched no command; may be empty after trimming.
    Unrecognized(String),
    /// End of input: nothing could be read.
    Eof,
    /// The read itself failed.
    Failed(std::io::Error),
}

impl Token {
    /// Parses a line of operator input into a token.
    pub fn from_line(line: &str) -> Self {
        match Command::parse(line) {
            Some(c) => Token::Command(c),
            None => Token::Unrecognized(line.trim().to_owned()),
        }
    }
}

/// Source of operator decisions.
///
/// Both methods run on a blocking thread and may block for as long as the
/// operator takes to answer.
pub trait InputChannel: Send {
    /// Cheap check for whether any input source is attached at all.
    ///
    /// May report `true` for a source that will never produce data; the
    /// session's bounded empty-read count covers that case.
    fn probe_available(&mut self) -> bool;

    /// Lists the available commands before the next read.
    ///
    /// The default prints the one-line menu. Channels that draw their own
    /// menu while reading (the raw-mode list) print nothing here.
    fn present_menu(&mut self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", menu_line())
    }

    /// Reads one token, writing any prompt or menu to `out`.
    ///
    /// Implementations that can wait without blocking on a read should return
    /// promptly once `cancel` is set, leaving the terminal as they found it.
    fn read_token(&mut self, out: &mut dyn Write, cancel: &AtomicBool) -> Token;
}

impl<C: InputChannel + ?Sized> InputChannel for Box<C> {
    fn probe_available(&mut self) -> bool {
        (**self).probe_available()
    }

    fn present_menu(&mut self, out: &mut dyn Write) -> io::Result<()> {
        (**self).present_menu(out)
    }

    fn read_token(&mut self, out: &mut dyn Write, cancel: &AtomicBool) -> Token {
        (**self).read_token(out, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_line_trims_and_parses() {
        assert!(matches!(Token::from_line(" Yes\n"), Token::Command(Command::Yes)));
        match Token::from_line("  maybe \n") {
            Token::Unrecognized(t) => assert_eq!(t, "maybe"),
            other => panic!("unexpected token {other:?}"),
        }
        assert!(matches!(Token::from_line("\n"), Token::Unrecognized(t) if t.is_empty()));
    }
}
