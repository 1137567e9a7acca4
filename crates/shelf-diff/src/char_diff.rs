//! Character-level diff used for inline highlighting of a changed line.

use serde::{Deserialize, Serialize};

use crate::lcs::{EditOp, LcsTable};
use crate::line_diff::DiffKind;

/// A run of characters sharing one classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharDiff {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    pub text: String,
}

impl CharDiff {
    pub fn new(kind: DiffKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Diff two strings character by character with exact equality.
///
/// Adjacent characters of the same kind are merged, so no two consecutive
/// runs share a kind. Equal inputs give a single `unchanged` run (even when
/// both are empty); an empty side gives a single `added` or `removed` run.
pub fn diff_chars(old: &str, new: &str) -> Vec<CharDiff> {
    if old == new {
        return vec![CharDiff::new(DiffKind::Unchanged, new)];
    }
    if old.is_empty() {
        return vec![CharDiff::new(DiffKind::Added, new)];
    }
    if new.is_empty() {
        return vec![CharDiff::new(DiffKind::Removed, old)];
    }

    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();
    let table = LcsTable::build(&old_chars, &new_chars, |a, b| a == b);

    let mut runs: Vec<CharDiff> = Vec::new();
    for op in table.edit_script() {
        let (kind, ch) = match op {
            EditOp::Keep { old_index, .. } => (DiffKind::Unchanged, old_chars[old_index]),
            EditOp::Insert { new_index } => (DiffKind::Added, new_chars[new_index]),
            EditOp::Delete { old_index } => (DiffKind::Removed, old_chars[old_index]),
        };
        match runs.last_mut() {
            Some(last) if last.kind == kind => last.text.push(ch),
            _ => runs.push(CharDiff::new(kind, ch)),
        }
    }

    runs
}
