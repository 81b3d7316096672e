//! Owned value types shared by the diff engine, the renderer, and the session.
//!
//! Everything here is plain data: fully owned, `Send`, and cheap to compare so
//! tests can assert on whole scripts and decisions with `assert_eq!`.

/// One line of an edit script.
///
/// The variant records what happens to the line when the patch is applied:
/// kept (`Context`), inserted (`Added`), or dropped (`Removed`). The stored
/// text never includes the line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiffLine {
    /// Present in both the old and the new content.
    Context(String),
    /// Present only in the new content.
    Added(String),
    /// Present only in the old content.
    Removed(String),
}

impl DiffLine {
    /// Returns the line text without its tag.
    pub fn text(&self) -> &str {
        match self {
            DiffLine::Context(t) | DiffLine::Added(t) | DiffLine::Removed(t) => t,
        }
    }

    /// Returns `true` for `Added` and `Removed` lines.
    pub fn is_change(&self) -> bool {
        !matches!(self, DiffLine::Context(_))
    }
}

/// Which input shape an [`EditScript`] was computed from.
///
/// The renderer needs this to tell a new file apart from an overwrite of an
/// empty file: both produce only `Added` lines but are displayed differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptKind {
    /// Neither side was supplied.
    #[default]
    Empty,
    /// Only new content was supplied (file creation).
    Created,
    /// Only old content was supplied (file deletion).
    Deleted,
    /// Both sides were supplied.
    Modified,
}

/// Ordered sequence of [`DiffLine`]s describing how `old` becomes `new`.
///
/// Keeping `Context` + `Removed` lines in order reconstructs the old content;
/// keeping `Context` + `Added` lines in order reconstructs the new content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditScript {
    /// Input shape the script was computed from.
    pub kind: ScriptKind,
    /// The lines, in patch order.
    pub lines: Vec<DiffLine>,
}

impl EditScript {
    /// Returns `true` when the script has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns `true` when at least one line is added or removed.
    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(DiffLine::is_change)
    }

    /// Derives the summary statistics. Always recomputed, never cached.
    pub fn stats(&self) -> DiffStats {
        DiffStats::from_lines(&self.lines)
    }

    /// Rebuilds the old side by joining `Context` and `Removed` lines.
    pub fn old_text(&self) -> String {
        self.side(|l| !matches!(l, DiffLine::Added(_)))
    }

    /// Rebuilds the new side by joining `Context` and `Added` lines.
    pub fn new_text(&self) -> String {
        self.side(|l| !matches!(l, DiffLine::Removed(_)))
    }

    fn side(&self, keep: impl Fn(&DiffLine) -> bool) -> String {
        self.lines
            .iter()
            .filter(|l| keep(l))
            .map(DiffLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Summary counts shown in the `+A -D ~M` stats line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffStats {
    /// Number of `Added` lines.
    pub additions: usize,
    /// Number of `Removed` lines.
    pub deletions: usize,
    /// Number of `Context` lines whose immediate neighbour in the whole script
    /// is an `Added` or `Removed` line.
    ///
    /// This is an adjacency heuristic over the entire script, not a count of
    /// modified lines in the diff-theoretic sense. A context line between two
    /// separate hunks is counted once.
    pub modified: usize,
}

impl DiffStats {
    /// Computes statistics over a slice of diff lines.
    pub fn from_lines(lines: &[DiffLine]) -> Self {
        let mut stats = DiffStats::default();
        for (i, line) in lines.iter().enumerate() {
            match line {
                DiffLine::Added(_) => stats.additions += 1,
                DiffLine::Removed(_) => stats.deletions += 1,
                DiffLine::Context(_) => {
                    let before = i > 0 && lines[i - 1].is_change();
                    let after = lines.get(i + 1).is_some_and(DiffLine::is_change);
                    if before || after {
                        stats.modified += 1;
                    }
                }
            }
        }
        stats
    }
}

impl std::fmt::Display for DiffStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "+{} -{} ~{}", self.additions, self.deletions, self.modified)
    }
}

/// Outcome of one approval request. Exactly one is returned per request.
///
/// Only `Approved` allows the caller to perform the write. `Rejected` and
/// `Error` both forbid it; the embedded text should be surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The operator approved the write.
    Approved,
    /// The write was refused, by the operator or by a fail-safe default.
    /// The reason is `None` when the operator simply answered "no".
    Rejected(Option<String>),
    /// The prompt itself could not be carried out.
    Error(String),
}

impl Decision {
    /// Rejection carrying an explanatory reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Decision::Rejected(Some(reason.into()))
    }

    /// Returns `true` only for [`Decision::Approved`].
    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved)
    }

    /// Returns the embedded reason or error message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Decision::Approved | Decision::Rejected(None) => None,
            Decision::Rejected(Some(m)) | Decision::Error(m) => Some(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(lines: Vec<DiffLine>) -> EditScript {
        EditScript { kind: ScriptKind::Modified, lines }
    }

    #[test]
    fn stats_count_context_next_to_changes_once() {
        let s = script(vec![
            DiffLine::Context("a".into()),
            DiffLine::Removed("b".into()),
            DiffLine::Context("c".into()),
            DiffLine::Added("d".into()),
            DiffLine::Context("e".into()),
            DiffLine::Context("f".into()),
        ]);
        let stats = s.stats();
        assert_eq!(stats.additions, 1);
        assert_eq!(stats.deletions, 1);
        // a, c and e touch a change; f does not.
        assert_eq!(stats.modified, 3);
        assert_eq!(stats.to_string(), "+1 -1 ~3");
    }

    #[test]
    fn stats_of_empty_script_are_zero() {
        assert_eq!(EditScript::default().stats().to_string(), "+0 -0 ~0");
    }

    #[test]
    fn sides_rebuild_from_tagged_lines() {
        let s = script(vec![
            DiffLine::Context("a".into()),
            DiffLine::Removed("b".into()),
            DiffLine::Added("x".into()),
        ]);
        assert_eq!(s.old_text(), "a\nb");
        assert_eq!(s.new_text(), "a\nx");
    }

    #[test]
    fn decision_message_and_approval() {
        assert!(Decision::Approved.is_approved());
        assert_eq!(Decision::Rejected(None).message(), None);
        assert_eq!(Decision::rejected("why").message(), Some("why"));
        assert!(!Decision::Error("boom".into()).is_approved());
    }
}
