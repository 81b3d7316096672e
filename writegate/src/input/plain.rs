//! Line-based input: one typed command per line.

use std::io::{BufRead, Write};
use std::sync::atomic::AtomicBool;

use writegate_core::{InputChannel, Token};

const PROMPT: &str = "Choice [y/n/a/d/v/?]: ";

/// Reads commands line by line from any buffered reader.
///
/// Works wherever a line can be read: a terminal in cooked mode, a pipe, or a
/// redirected file. A read of zero bytes is end of input.
pub struct PlainChannel<R> {
    reader: R,
}

impl<R: BufRead> PlainChannel<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead + Send> InputChannel for PlainChannel<R> {
    fn probe_available(&mut self) -> bool {
        true
    }

    /// Prints the prompt and reads one line. Cannot be interrupted by `cancel`
    /// once blocked in the read.
    fn read_token(&mut self, out: &mut dyn Write, _cancel: &AtomicBool) -> Token {
        if let Err(e) = write!(out, "{PROMPT}").and_then(|()| out.flush()) {
            return Token::Failed(e);
        }
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            // Keep the next prompt off the unanswered one.
            Ok(0) => match writeln!(out) {
                Ok(()) => Token::Eof,
                Err(e) => Token::Failed(e),
            },
            Ok(_) => Token::from_line(&line),
            Err(e) => Token::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};
    use writegate_core::Command;

    fn read_all(input: &str) -> (Vec<Token>, String) {
        let mut channel = PlainChannel::new(Cursor::new(input.as_bytes().to_vec()));
        let cancel = AtomicBool::new(false);
        let mut out = Vec::new();
        let mut tokens = Vec::new();
        loop {
            let token = channel.read_token(&mut out, &cancel);
            let done = matches!(token, Token::Eof);
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_lines_and_ends_with_eof() {
        let (tokens, out) = read_all("Y\n  always \nwhat\n\n");
        assert!(matches!(tokens[0], Token::Command(Command::Yes)));
        assert!(matches!(tokens[1], Token::Command(Command::Always)));
        assert!(matches!(&tokens[2], Token::Unrecognized(t) if t == "what"));
        assert!(matches!(&tokens[3], Token::Unrecognized(t) if t.is_empty()));
        assert!(matches!(tokens[4], Token::Eof));
        assert_eq!(out.matches(PROMPT).count(), 5);
    }

    #[test]
    fn last_line_without_newline_still_counts() {
        let (tokens, _) = read_all("n");
        assert!(matches!(tokens[0], Token::Command(Command::No)));
        assert!(matches!(tokens[1], Token::Eof));
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }
    }

    /// Accepts the prompt but fails on the bare newline written at end of input.
    struct NewlineFails;

    impl Write for NewlineFails {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf == b"\n" {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"))
            } else {
                Ok(buf.len())
            }
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn output_failure_at_end_of_input_is_reported() {
        let mut channel = PlainChannel::new(Cursor::new(Vec::new()));
        let token = channel.read_token(&mut NewlineFails, &AtomicBool::new(false));
        assert!(matches!(token, Token::Failed(e) if e.kind() == io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn read_errors_become_failed_tokens() {
        let mut channel = PlainChannel::new(io::BufReader::new(Broken));
        let token = channel.read_token(&mut Vec::new(), &AtomicBool::new(false));
        assert!(matches!(token, Token::Failed(e) if e.to_string() == "device gone"));
    }
}
