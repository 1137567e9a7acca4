//! Line-level diff: LCS matching on comparison keys.
//!
//! Lines are split positionally on `'\n'` (an empty text is one empty line)
//! and matched by [`comparison_key`], so a line whose only edits are
//! punctuation or whitespace stays `unchanged`.

use serde::{Deserialize, Serialize};

use crate::lcs::LcsTable;
use crate::summary::ChangeSummary;

/// Classification of a diffed line or character run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Unchanged,
    Added,
    Removed,
}

impl DiffKind {
    /// Lowercase name, as used in JSON and CSS classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Added => "added",
            Self::Removed => "removed",
        }
    }
}

impl std::fmt::Display for DiffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single classified line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffItem {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    /// Line text. For `unchanged` lines this is the new-side text.
    pub content: String,
    /// 1-based line number on the contributing side: old for `removed`,
    /// new for `added` and `unchanged`.
    pub line_number: usize,
    /// Old-side text of an `unchanged` line, present only when it differs
    /// from `content` (punctuation or whitespace edits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_content: Option<String>,
}

impl DiffItem {
    fn new(kind: DiffKind, content: &str, line_number: usize) -> Self {
        Self {
            kind,
            content: content.to_string(),
            line_number,
            old_content: None,
        }
    }

    /// Text of this line as it appears in the old version.
    ///
    /// Returns `None` for `added` lines.
    pub fn old_text(&self) -> Option<&str> {
        match self.kind {
            DiffKind::Added => None,
            DiffKind::Removed => Some(&self.content),
            DiffKind::Unchanged => Some(self.old_content.as_deref().unwrap_or(&self.content)),
        }
    }

    /// Text of this line as it appears in the new version.
    ///
    /// Returns `None` for `removed` lines.
    pub fn new_text(&self) -> Option<&str> {
        match self.kind {
            DiffKind::Removed => None,
            DiffKind::Added | DiffKind::Unchanged => Some(&self.content),
        }
    }
}

/// Ordered line classification produced by one [`diff_lines`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffScript {
    items: Vec<DiffItem>,
}

impl DiffScript {
    pub fn items(&self) -> &[DiffItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffItem> {
        self.items.iter()
    }

    /// Number of `added` lines.
    pub fn additions(&self) -> usize {
        self.count(DiffKind::Added)
    }

    /// Number of `removed` lines.
    pub fn deletions(&self) -> usize {
        self.count(DiffKind::Removed)
    }

    /// Returns `true` if any line was added or removed.
    pub fn has_changes(&self) -> bool {
        self.items.iter().any(|item| item.kind != DiffKind::Unchanged)
    }

    /// Added/removed line counts.
    pub fn summary(&self) -> ChangeSummary {
        ChangeSummary {
            added: self.additions(),
            removed: self.deletions(),
        }
    }

    /// Old version's lines, in order.
    pub fn old_lines(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(DiffItem::old_text)
    }

    /// New version's lines, in order.
    pub fn new_lines(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(DiffItem::new_text)
    }

    fn count(&self, kind: DiffKind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a DiffScript {
    type Item = &'a DiffItem;
    type IntoIter = std::slice::Iter<'a, DiffItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Reduce a line to the characters that take part in matching: ASCII
/// letters, ASCII digits and CJK ideographs in U+4E00..=U+9FA5.
pub fn comparison_key(line: &str) -> String {
    line.chars().filter(|&ch| is_key_char(ch)).collect()
}

fn is_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fa5}').contains(&ch)
}

/// Split a text into physical lines on `'\n'`.
///
/// No trailing-newline normalization: `""` is one empty line and `"a\n"` is
/// `["a", ""]`.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

struct KeyedLine<'a> {
    text: &'a str,
    key: String,
}

fn keyed_lines(text: &str) -> Vec<KeyedLine<'_>> {
    split_lines(text)
        .into_iter()
        .map(|text| KeyedLine {
            text,
            key: comparison_key(text),
        })
        .collect()
}

fn same_key(a: &KeyedLine<'_>, b: &KeyedLine<'_>) -> bool {
    a.key == b.key
}

/// Compute the line-level diff of `old` against `new`.
///
/// The LCS anchors are walked in lockstep with both line sequences: old lines
/// whose key differs from the next anchor's are `removed`, then new lines
/// whose key differs are `added`, then one `unchanged` line is emitted for the
/// anchor. Lines left after the last anchor are emitted as `removed`, then
/// `added`.
pub fn diff_lines(old: &str, new: &str) -> DiffScript {
    let old_lines = keyed_lines(old);
    let new_lines = keyed_lines(new);
    let anchors = LcsTable::build(&old_lines, &new_lines, same_key).anchors();

    let mut items = Vec::with_capacity(old_lines.len() + new_lines.len() - anchors.len());
    let mut old_index = 0;
    let mut new_index = 0;

    for anchor in &anchors {
        let key = &new_lines[anchor.new_index].key;

        while old_index < old_lines.len() && old_lines[old_index].key != *key {
            items.push(DiffItem::new(
                DiffKind::Removed,
                old_lines[old_index].text,
                old_index + 1,
            ));
            old_index += 1;
        }

        while new_index < new_lines.len() && new_lines[new_index].key != *key {
            items.push(DiffItem::new(
                DiffKind::Added,
                new_lines[new_index].text,
                new_index + 1,
            ));
            new_index += 1;
        }

        // Anchors are a key-subsequence of both sides, so the greedy scans
        // above always stop on a line.
        if old_index == old_lines.len() || new_index == new_lines.len() {
            break;
        }

        let old_text = old_lines[old_index].text;
        let new_text = new_lines[new_index].text;
        let mut item = DiffItem::new(DiffKind::Unchanged, new_text, new_index + 1);
        if old_text != new_text {
            item.old_content = Some(old_text.to_string());
        }
        items.push(item);
        old_index += 1;
        new_index += 1;
    }

    items.extend(
        old_lines[old_index..]
            .iter()
            .enumerate()
            .map(|(offset, line)| {
                DiffItem::new(DiffKind::Removed, line.text, old_index + offset + 1)
            }),
    );
    items.extend(
        new_lines[new_index..]
            .iter()
            .enumerate()
            .map(|(offset, line)| DiffItem::new(DiffKind::Added, line.text, new_index + offset + 1)),
    );

    DiffScript { items }
}
