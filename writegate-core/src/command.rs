//! The operator's command vocabulary.
//!
//! The accepted tokens are a stable contract: scripts and muscle memory depend
//! on `y`/`n`/`a`/`d`/`v`/`?`, so they must never be renamed or reassigned.

/// A command the operator can give at the approval prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Approve this write.
    Yes,
    /// Reject this write.
    No,
    /// Approve this write and every later one in the session.
    Always,
    /// Reject this write and every later one in the session.
    Deny,
    /// Show the full diff without truncation.
    View,
    /// Show the command reference.
    Help,
}

impl Command {
    /// Menu order used by the interactive selector and the help text.
    pub const MENU: [Command; 6] = [
        Command::Yes,
        Command::No,
        Command::Always,
        Command::Deny,
        Command::View,
        Command::Help,
    ];

    /// Parses one operator token. Surrounding whitespace and case are ignored.
    ///
    /// Returns `None` for anything outside the vocabulary, including the empty
    /// string.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Some(Command::Yes),
            "n" | "no" => Some(Command::No),
            "a" | "always" => Some(Command::Always),
            "d" | "deny" => Some(Command::Deny),
            "v" | "view" => Some(Command::View),
            "?" | "help" => Some(Command::Help),
            _ => None,
        }
    }

    /// Long form of the command, as typed.
    pub fn label(self) -> &'static str {
        match self {
            Command::Yes => "yes",
            Command::No => "no",
            Command::Always => "always",
            Command::Deny => "deny",
            Command::View => "view",
            Command::Help => "help",
        }
    }

    /// Single-key short form of the command.
    pub fn shortcut(self) -> char {
        match self {
            Command::Yes => 'y',
            Command::No => 'n',
            Command::Always => 'a',
            Command::Deny => 'd',
            Command::View => 'v',
            Command::Help => '?',
        }
    }

    /// One-line description shown in menus and help.
    pub fn description(self) -> &'static str {
        match self {
            Command::Yes => "approve this change",
            Command::No => "reject this change",
            Command::Always => "approve this and all remaining changes",
            Command::Deny => "reject this and all remaining changes",
            Command::View => "show the full diff",
            Command::Help => "show this help",
        }
    }
}

/// Compact one-line menu, e.g. `[y]es [n]o [a]lways [d]eny [v]iew [?]help`.
pub fn menu_line() -> String {
    Command::MENU
        .iter()
        .map(|c| match c {
            Command::Help => "[?]help".to_owned(),
            c => format!("[{}]{}", c.shortcut(), &c.label()[1..]),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Multi-line command reference printed for `help`.
pub fn help_text() -> String {
    let mut out = String::from("Commands:\n");
    for c in Command::MENU {
        out.push_str(&format!(
            "  {} / {:<8}{}\n",
            c.shortcut(),
            c.label(),
            c.description()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_short_and_long_forms_in_any_case() {
        assert_eq!(Command::parse("y"), Some(Command::Yes));
        assert_eq!(Command::parse("  YES \n"), Some(Command::Yes));
        assert_eq!(Command::parse("No"), Some(Command::No));
        assert_eq!(Command::parse("a"), Some(Command::Always));
        assert_eq!(Command::parse("DENY"), Some(Command::Deny));
        assert_eq!(Command::parse("v"), Some(Command::View));
        assert_eq!(Command::parse("?"), Some(Command::Help));
        assert_eq!(Command::parse("help"), Some(Command::Help));
    }

    #[test]
    fn parse_rejects_unknown_and_empty() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("yep"), None);
        assert_eq!(Command::parse("q"), None);
    }

    #[test]
    fn labels_round_trip_through_parse() {
        for c in Command::MENU {
            assert_eq!(Command::parse(c.label()), Some(c));
            assert_eq!(Command::parse(&c.shortcut().to_string()), Some(c));
        }
    }

    #[test]
    fn menu_line_lists_all_shortcuts() {
        assert_eq!(menu_line(), "[y]es [n]o [a]lways [d]eny [v]iew [?]help");
    }
}
