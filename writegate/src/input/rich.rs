//! Arrow-key menu in raw mode.
//!
//! Draws the command list below the diff with one highlighted row. Up/Down
//! move the highlight (wrapping at both ends), Enter picks it, and the command
//! shortcuts pick directly. `q`, Esc and Ctrl-C all mean "no".
//!
//! Key handling ([`Menu::handle_key`]) is pure so it can be tested without a
//! terminal; [`read_choice`] owns the raw-mode loop around it.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::QueueableCommand;
use crossterm::terminal::{Clear, ClearType};
use writegate_core::{Command, Token};

use crate::tui::RawModeGuard;

/// How long one poll waits for a key before re-checking the cancel flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of feeding one key to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// The highlight moved; redraw.
    Redraw,
    /// The operator picked a command.
    Choose(Command),
    /// The key means nothing here.
    Ignore,
}

/// Selection state of the command menu.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Menu {
    selected: usize,
}

impl Menu {
    /// The highlighted command.
    pub fn selected(&self) -> Command {
        Command::MENU[self.selected]
    }

    /// Applies one key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> MenuAction {
        let len = Command::MENU.len();
        match key.code {
            KeyCode::Up => {
                self.selected = (self.selected + len - 1) % len;
                MenuAction::Redraw
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % len;
                MenuAction::Redraw
            }
            KeyCode::Enter => MenuAction::Choose(self.selected()),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                MenuAction::Choose(Command::No)
            }
            KeyCode::Char('q') | KeyCode::Esc => MenuAction::Choose(Command::No),
            KeyCode::Char(c) => match Command::parse(&c.to_string()) {
                Some(command) => MenuAction::Choose(command),
                None => MenuAction::Ignore,
            },
            _ => MenuAction::Ignore,
        }
    }
}

/// Runs the command menu for one read.
///
/// [`RawMenu`] is the terminal implementation; the channel takes any
/// implementation so fallback behavior can be driven without a terminal.
pub trait MenuStrategy: Send {
    /// Returns the chosen command, or `Err` when the menu cannot run at all.
    fn read_choice(&mut self, out: &mut dyn Write, cancel: &AtomicBool) -> io::Result<Token>;
}

/// The raw-mode menu on the process's terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawMenu;

impl MenuStrategy for RawMenu {
    fn read_choice(&mut self, out: &mut dyn Write, cancel: &AtomicBool) -> io::Result<Token> {
        read_choice(out, cancel)
    }
}

/// Runs the menu until a command is chosen or `cancel` is set.
///
/// # Errors
///
/// Returns `Err` if raw mode cannot be entered or the terminal fails while the
/// menu is up. The terminal is restored before the error reaches the caller,
/// which may then fall back to line input.
pub fn read_choice(out: &mut dyn Write, cancel: &AtomicBool) -> io::Result<Token> {
    let _guard = RawModeGuard::acquire()?;
    let mut menu = Menu::default();
    draw(out, &menu)?;

    loop {
        if cancel.load(Ordering::Relaxed) {
            erase(out)?;
            return Ok(Token::Failed(io::Error::new(
                io::ErrorKind::Interrupted,
                "approval prompt was cancelled",
            )));
        }
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Windows reports releases too; only presses count.
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match menu.handle_key(key) {
            MenuAction::Redraw => {
                erase(out)?;
                draw(out, &menu)?;
            }
            MenuAction::Choose(command) => {
                erase(out)?;
                out.queue(Print(format!("> {}\r\n", command.label())))?;
                out.flush()?;
                return Ok(Token::Command(command));
            }
            MenuAction::Ignore => {}
        }
    }
}

/// Draws the menu starting at the current line, leaving the cursor below it.
fn draw(out: &mut dyn Write, menu: &Menu) -> io::Result<()> {
    for (i, command) in Command::MENU.iter().enumerate() {
        let row = format!(
            "{} {:<7} {}",
            command.shortcut(),
            command.label(),
            command.description()
        );
        if i == menu.selected {
            out.queue(Print("> "))?
                .queue(SetAttribute(Attribute::Reverse))?
                .queue(Print(row))?
                .queue(SetAttribute(Attribute::Reset))?
                .queue(Print("\r\n"))?;
        } else {
            out.queue(Print(format!("  {row}\r\n")))?;
        }
    }
    out.flush()
}

/// Moves back to the first menu row and clears everything below it.
fn erase(out: &mut dyn Write) -> io::Result<()> {
    out.queue(MoveUp(Command::MENU.len() as u16))?
        .queue(MoveToColumn(0))?
        .queue(Clear(ClearType::FromCursorDown))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_wrap_around_the_menu() {
        let mut menu = Menu::default();
        assert_eq!(menu.selected(), Command::Yes);
        assert_eq!(menu.handle_key(key(KeyCode::Up)), MenuAction::Redraw);
        assert_eq!(menu.selected(), Command::Help);
        assert_eq!(menu.handle_key(key(KeyCode::Down)), MenuAction::Redraw);
        assert_eq!(menu.selected(), Command::Yes);
        menu.handle_key(key(KeyCode::Down));
        menu.handle_key(key(KeyCode::Down));
        assert_eq!(menu.selected(), Command::Always);
    }

    #[test]
    fn enter_picks_the_highlighted_command() {
        let mut menu = Menu::default();
        menu.handle_key(key(KeyCode::Down));
        assert_eq!(
            menu.handle_key(key(KeyCode::Enter)),
            MenuAction::Choose(Command::No)
        );
    }

    #[test]
    fn quit_keys_mean_no() {
        let mut menu = Menu::default();
        let no = MenuAction::Choose(Command::No);
        assert_eq!(menu.handle_key(key(KeyCode::Char('q'))), no);
        assert_eq!(menu.handle_key(key(KeyCode::Esc)), no);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(menu.handle_key(ctrl_c), no);
    }

    #[test]
    fn shortcuts_pick_directly() {
        let mut menu = Menu::default();
        assert_eq!(
            menu.handle_key(key(KeyCode::Char('a'))),
            MenuAction::Choose(Command::Always)
        );
        assert_eq!(
            menu.handle_key(key(KeyCode::Char('?'))),
            MenuAction::Choose(Command::Help)
        );
        assert_eq!(menu.handle_key(key(KeyCode::Char('x'))), MenuAction::Ignore);
        assert_eq!(menu.handle_key(key(KeyCode::Tab)), MenuAction::Ignore);
    }
}
