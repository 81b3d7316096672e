//! Line-level diff engine.
//!
//! [`compute`] turns two optional text blobs into an [`EditScript`] by aligning
//! both line sequences against one longest common subsequence. The LCS table is
//! the classic O(n·m) dynamic program; inputs are source files, so the quadratic
//! cost is accepted in exchange for a simple and fully deterministic result.

use crate::types::{DiffLine, EditScript, ScriptKind};

/// Splits `text` into lines on `\n`.
///
/// A trailing newline produces a trailing empty line and the empty string
/// produces a single empty line, so `split_lines(t).join("\n") == t` always.
/// Carriage returns are kept as part of the line text.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Computes the edit script turning `old` into `new`.
///
/// - neither side → empty script
/// - only `new` → every line `Added` (file creation)
/// - only `old` → every line `Removed` (file deletion)
/// - both → LCS alignment; inside each gap `Removed` lines precede `Added` ones
///
/// Never fails and always returns the same script for the same inputs.
pub fn compute(old: Option<&str>, new: Option<&str>) -> EditScript {
    match (old, new) {
        (None, None) => EditScript::default(),
        (None, Some(new)) => EditScript {
            kind: ScriptKind::Created,
            lines: split_lines(new)
                .into_iter()
                .map(|l| DiffLine::Added(l.to_owned()))
                .collect(),
        },
        (Some(old), None) => EditScript {
            kind: ScriptKind::Deleted,
            lines: split_lines(old)
                .into_iter()
                .map(|l| DiffLine::Removed(l.to_owned()))
                .collect(),
        },
        (Some(old), Some(new)) => {
            let old = split_lines(old);
            let new = split_lines(new);
            EditScript {
                kind: ScriptKind::Modified,
                lines: align(&old, &new, &lcs_pairs(&old, &new)),
            }
        }
    }
}

/// Returns the index pairs `(old_idx, new_idx)` of one LCS, in ascending order.
///
/// The backtrack starts at the bottom-right of the table. When skipping a line
/// from either side would keep the same score, the line from `new` is skipped
/// first; this fixes which of several optimal alignments is chosen.
pub fn lcs_pairs(old: &[&str], new: &[&str]) -> Vec<(usize, usize)> {
    let n = old.len();
    let m = new.len();
    let width = m + 1;
    // table[i * width + j] = LCS length of old[..i] and new[..j]
    let mut table = vec![0u32; (n + 1) * width];
    for i in 1..=n {
        for j in 1..=m {
            table[i * width + j] = if old[i - 1] == new[j - 1] {
                table[(i - 1) * width + (j - 1)] + 1
            } else {
                table[(i - 1) * width + j].max(table[i * width + (j - 1)])
            };
        }
    }

    let mut pairs = Vec::with_capacity(table[n * width + m] as usize);
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        if old[i - 1] == new[j - 1] {
            pairs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if table[i * width + (j - 1)] >= table[(i - 1) * width + j] {
            j -= 1;
        } else {
            i -= 1;
        }
    }
    pairs.reverse();
    pairs
}

/// Walks both sequences against the common pairs and emits the script.
fn align(old: &[&str], new: &[&str], pairs: &[(usize, usize)]) -> Vec<DiffLine> {
    let mut lines = Vec::with_capacity(old.len() + new.len());
    let (mut oi, mut nj) = (0, 0);
    for &(pi, pj) in pairs {
        push_gap(&mut lines, &old[oi..pi], &new[nj..pj]);
        lines.push(DiffLine::Context(old[pi].to_owned()));
        oi = pi + 1;
        nj = pj + 1;
    }
    push_gap(&mut lines, &old[oi..], &new[nj..]);
    lines
}

fn push_gap(lines: &mut Vec<DiffLine>, removed: &[&str], added: &[&str]) {
    lines.extend(removed.iter().map(|l| DiffLine::Removed((*l).to_owned())));
    lines.extend(added.iter().map(|l| DiffLine::Added((*l).to_owned())));
}
