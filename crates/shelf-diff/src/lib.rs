//! Diff engine for promptshelf.
//!
//! Compares two versions of a prompt text and produces the artifacts the
//! editor renders: a line-level edit script, a change summary, a similarity
//! score and an inline character diff.
//!
//! Every operation is a pure function of its inputs. The engine keeps no
//! state between calls and performs no input size checks; callers that accept
//! untrusted input must bound it first (the DP table is `O(m * n)`).
//!
//! # Key Types
//!
//! - [`LcsTable`] -- LCS table generic over item type and equality predicate
//! - [`DiffScript`] / [`DiffItem`] -- Line-level diff (see [`diff_lines`])
//! - [`CharDiff`] -- Character-level diff runs (see [`diff_chars`])
//! - [`ChangeSummary`] -- Added/removed line counts (see [`similarity`] for the score)
//! - [`InlineMarkup`] -- Two-pane inline highlight markup
//!
//! # Matching Policies
//!
//! Lines match when their [`comparison_key`]s are equal: only ASCII letters,
//! ASCII digits and CJK ideographs (U+4E00..=U+9FA5) take part, so edits to
//! punctuation or whitespace alone do not register as changes. Characters
//! match on exact equality.

pub mod char_diff;
pub mod html;
pub mod lcs;
pub mod line_diff;
pub mod summary;

pub use char_diff::{diff_chars, CharDiff};
pub use html::{
    escape_html, inline_markup, render_inline, to_html, InlineMarkup, EMPTY_LINE_PLACEHOLDER,
};
pub use lcs::{lcs_len, Anchor, EditOp, LcsTable};
pub use line_diff::{comparison_key, diff_lines, split_lines, DiffItem, DiffKind, DiffScript};
pub use summary::{similarity, summarize, ChangeSummary, NO_CHANGES};
