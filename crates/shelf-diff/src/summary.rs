//! Change summaries and similarity scores.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lcs::lcs_len;
use crate::line_diff::{comparison_key, split_lines, DiffScript};

/// Summary text for a diff with no added or removed lines.
pub const NO_CHANGES: &str = "no changes";

/// Added and removed line counts of a [`DiffScript`].
///
/// Displays as `"+N lines, -M lines"` (zero counts omitted, added first) or
/// [`NO_CHANGES`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
}

impl ChangeSummary {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.added, self.removed) {
            (0, 0) => f.write_str(NO_CHANGES),
            (added, 0) => write!(f, "+{added} lines"),
            (0, removed) => write!(f, "-{removed} lines"),
            (added, removed) => write!(f, "+{added} lines, -{removed} lines"),
        }
    }
}

/// Summary string of a diff, as stored in history entries.
pub fn summarize(script: &DiffScript) -> String {
    script.summary().to_string()
}

/// Line similarity of two texts as a percentage in `0..=100`.
///
/// 100 exactly when the texts are equal. 0 when either is empty (and they
/// differ). Otherwise the LCS length over comparison keys divided by the
/// larger line count, rounded half up and capped at 99, since texts that
/// differ only in punctuation or whitespace still differ.
pub fn similarity(old: &str, new: &str) -> u8 {
    if old == new {
        return 100;
    }
    if old.is_empty() || new.is_empty() {
        return 0;
    }

    let old_keys: Vec<String> = split_lines(old).into_iter().map(comparison_key).collect();
    let new_keys: Vec<String> = split_lines(new).into_iter().map(comparison_key).collect();
    let common = lcs_len(&old_keys, &new_keys, |a, b| a == b);
    let longest = old_keys.len().max(new_keys.len());

    // round(100 * common / longest) in integers; common <= longest.
    let score = (200 * common + longest) / (2 * longest);
    score.min(99) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_diff::diff_lines;

    #[test]
    fn summary_of_no_changes() {
        let script = diff_lines("same\ntext", "same\ntext");
        assert_eq!(summarize(&script), NO_CHANGES);
        assert!(script.summary().is_empty());
    }

    #[test]
    fn summary_lists_added_first() {
        let script = diff_lines("a\nb\nc", "a\nx\nc");
        assert_eq!(summarize(&script), "+1 lines, -1 lines");
    }

    #[test]
    fn summary_omits_zero_counts() {
        assert_eq!(summarize(&diff_lines("a", "a\nb\nc")), "+2 lines");
        assert_eq!(summarize(&diff_lines("a\nb", "a")), "-1 lines");
    }

    #[test]
    fn summary_is_symmetric() {
        let a = "intro\nstep one\nstep two\noutro";
        let b = "intro\nstep 1\nstep two\nextra\noutro";
        let forward = diff_lines(a, b).summary();
        let backward = diff_lines(b, a).summary();
        assert_eq!(forward.added, backward.removed);
        assert_eq!(forward.removed, backward.added);
    }

    #[test]
    fn similarity_rounds() {
        assert_eq!(similarity("a\nb", "a\nb\nc"), 67);
        assert_eq!(similarity("a\nb\nc\nd\ne\nf\ng\nh", "a\nx"), 13);
    }

    #[test]
    fn similarity_identity_and_empty() {
        assert_eq!(similarity("", ""), 100);
        assert_eq!(similarity("text", "text"), 100);
        assert_eq!(similarity("", "text"), 0);
        assert_eq!(similarity("text", ""), 0);
    }

    #[test]
    fn similarity_ignores_punctuation_but_is_below_100() {
        // Keys match on every line, but the raw strings differ.
        assert_eq!(similarity("Hello, world!", "Hello world"), 99);
        assert_eq!(similarity("a\nb", "a\nb\n"), 67);
        assert_eq!(similarity("a\nb", "c\nd"), 0);
    }

    #[test]
    fn display_matches_summarize() {
        let summary = ChangeSummary {
            added: 3,
            removed: 2,
        };
        assert_eq!(summary.to_string(), "+3 lines, -2 lines");
        assert_eq!(ChangeSummary::default().to_string(), NO_CHANGES);
    }
}
