//! Text rendering of edit scripts.
//!
//! [`render`] produces plain text; [`colorize`] is a separate post-pass that
//! wraps already-rendered lines in terminal color codes. Keeping the two apart
//! lets tests assert on exact uncolored output.
//!
//! Structural elements of the output (banner titles, the `+A -D ~M` stats line,
//! the `+` / `-` / space prefixes and the line-number columns) are stable.
//! The decorative rule characters are not.

use std::fmt::Write as _;

use crossterm::style::{style, Color, Stylize};

use crate::types::{DiffLine, EditScript, ScriptKind};

/// Unchanged lines shown on each side of a change in the default view.
pub const DEFAULT_CONTEXT: usize = 3;

/// Lines listed for a new or deleted file before the "more lines" marker.
pub const PREVIEW_CAP: usize = 10;

/// Context value that disables all truncation and folding.
pub const FULL_CONTEXT: usize = usize::MAX;

/// Leading text of the stats line; [`colorize`] keys on it.
pub const STATS_LABEL: &str = "Changes:";

const RULE: &str = "━━━━━━━━";
const GUTTER: &str = "│";

/// Renders `script` as human-readable text, one `\n`-terminated row per line.
///
/// `context_lines` bounds how much of the script is shown: new and deleted
/// files are capped at [`PREVIEW_CAP`] lines, and unchanged runs in a modified
/// file are folded beyond `context_lines` rows from the nearest change.
/// Passing [`FULL_CONTEXT`] shows everything.
pub fn render(script: &EditScript, context_lines: usize) -> String {
    match script.kind {
        ScriptKind::Empty => {
            format!("{RULE} NO CHANGES {RULE}\nNothing to compare: both sides are empty.\n")
        }
        ScriptKind::Created => render_listing(script, "NEW FILE", '+', context_lines),
        ScriptKind::Deleted => render_listing(script, "DELETED FILE", '-', context_lines),
        ScriptKind::Modified => render_changes(script, context_lines),
    }
}

/// Renders a whole-file listing for a created or deleted file.
fn render_listing(script: &EditScript, title: &str, prefix: char, context_lines: usize) -> String {
    let total = script.lines.len();
    let shown = if context_lines == FULL_CONTEXT {
        total
    } else {
        total.min(PREVIEW_CAP)
    };

    let mut out = String::new();
    let noun = if total == 1 { "line" } else { "lines" };
    let _ = writeln!(out, "{RULE} {title} ({total} {noun}) {RULE}");
    for line in &script.lines[..shown] {
        let _ = writeln!(out, "{prefix} {}", line.text());
    }
    if shown < total {
        let _ = writeln!(out, "  ... {} more lines", total - shown);
    }
    let _ = writeln!(out, "{RULE}{RULE}");
    out
}

/// Renders a modified file: banner, stats line, then numbered rows.
fn render_changes(script: &EditScript, context_lines: usize) -> String {
    let lines = &script.lines;
    let mut out = String::new();
    let _ = writeln!(out, "{RULE} FILE CHANGES {RULE}");
    let _ = writeln!(out, "{STATS_LABEL} {}", script.stats());
    if !script.has_changes() {
        let _ = writeln!(out, "No changes.");
    }

    let old_total = lines.iter().filter(|l| !matches!(l, DiffLine::Added(_))).count();
    let new_total = lines.iter().filter(|l| !matches!(l, DiffLine::Removed(_))).count();
    let width = old_total.max(new_total).to_string().len();
    let visible = visibility(lines, context_lines);

    let (mut old_no, mut new_no) = (0usize, 0usize);
    let mut folded = 0usize;
    for (line, show) in lines.iter().zip(visible) {
        match line {
            DiffLine::Context(_) => {
                old_no += 1;
                new_no += 1;
            }
            DiffLine::Removed(_) => old_no += 1,
            DiffLine::Added(_) => new_no += 1,
        }
        if !show {
            folded += 1;
            continue;
        }
        flush_fold(&mut out, &mut folded, width);
        let (prefix, old_col, new_col) = match line {
            DiffLine::Context(_) => (' ', old_no.to_string(), new_no.to_string()),
            DiffLine::Removed(_) => ('-', old_no.to_string(), String::new()),
            DiffLine::Added(_) => ('+', String::new(), new_no.to_string()),
        };
        let _ = writeln!(
            out,
            "{prefix} {old_col:>width$} {new_col:>width$} {GUTTER} {}",
            line.text()
        );
    }
    flush_fold(&mut out, &mut folded, width);
    let _ = writeln!(out, "{RULE}{RULE}");
    out
}

fn flush_fold(out: &mut String, folded: &mut usize, width: usize) {
    if *folded > 0 {
        let pad = " ".repeat(width * 2 + 4);
        let noun = if *folded == 1 { "line" } else { "lines" };
        let _ = writeln!(out, "{pad}{GUTTER} ... {} unchanged {noun}", *folded);
        *folded = 0;
    }
}

/// Marks which rows survive folding: every change, plus context rows within
/// `context_lines` of some change.
fn visibility(lines: &[DiffLine], context_lines: usize) -> Vec<bool> {
    if context_lines == FULL_CONTEXT {
        return vec![true; lines.len()];
    }
    // Distance to the nearest change on either side, saturating when none.
    let mut dist = vec![usize::MAX; lines.len()];
    let mut last = None;
    for (i, line) in lines.iter().enumerate() {
        if line.is_change() {
            last = Some(i);
        }
        if let Some(c) = last {
            dist[i] = i - c;
        }
    }
    last = None;
    for (i, line) in lines.iter().enumerate().rev() {
        if line.is_change() {
            last = Some(i);
        }
        if let Some(c) = last {
            dist[i] = dist[i].min(c - i);
        }
    }
    dist.into_iter().map(|d| d <= context_lines).collect()
}

/// Colors applied by [`colorize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Lines starting with `+`.
    pub added: Color,
    /// Lines starting with `-`.
    pub removed: Color,
    /// The stats line.
    pub stats: Color,
    /// Banner and separator rules.
    pub rule: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            added: Color::Green,
            removed: Color::Red,
            stats: Color::Cyan,
            rule: Color::DarkGrey,
        }
    }
}

/// Colors rendered diff text with the default [`Palette`].
///
/// Returns `text` unchanged when `enabled` is false. Apply once to the output
/// of [`render`]; the result is not meant to be colorized again.
pub fn colorize(text: &str, enabled: bool) -> String {
    if !enabled {
        return text.to_owned();
    }
    colorize_with(text, &Palette::default())
}

/// Colors rendered diff text line by line with an explicit palette.
pub fn colorize_with(text: &str, palette: &Palette) -> String {
    text.split('\n')
        .map(|line| {
            let color = if line.starts_with('+') {
                Some(palette.added)
            } else if line.starts_with('-') {
                Some(palette.removed)
            } else if line.starts_with(STATS_LABEL) {
                Some(palette.stats)
            } else if line.starts_with(RULE) {
                Some(palette.rule)
            } else {
                None
            };
            match color {
                Some(c) if !line.is_empty() => style(line).with(c).to_string(),
                _ => line.to_owned(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
