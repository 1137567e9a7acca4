//! HTML assembly for diff rendering.
//!
//! Escaping is always passed in by the caller so the engine never depends on
//! a rendering target. [`escape_html`] is the escaper the server and CLI use.

use serde::{Deserialize, Serialize};

use crate::char_diff::{diff_chars, CharDiff};
use crate::line_diff::{DiffKind, DiffScript};

/// Rendered in place of an empty line so it stays visible.
pub const EMPTY_LINE_PLACEHOLDER: &str = "(empty line)";

/// Old and new panes of an inline character diff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineMarkup {
    pub old_markup: String,
    pub new_markup: String,
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Character-diff two lines and render both panes.
pub fn inline_markup<E>(old_line: &str, new_line: &str, escape: E) -> InlineMarkup
where
    E: Fn(&str) -> String,
{
    render_inline(&diff_chars(old_line, new_line), escape)
}

/// Render character-diff runs into old and new panes.
///
/// Unchanged runs go to both panes, removed runs only to the old pane and
/// added runs only to the new pane, each wrapped in its marker span.
pub fn render_inline<E>(runs: &[CharDiff], escape: E) -> InlineMarkup
where
    E: Fn(&str) -> String,
{
    let mut markup = InlineMarkup::default();
    for run in runs {
        let text = escape(&run.text);
        match run.kind {
            DiffKind::Unchanged => {
                markup.old_markup.push_str(&text);
                markup.new_markup.push_str(&text);
            }
            DiffKind::Removed => {
                markup.old_markup.push_str("<span class=\"diff-char-removed\">");
                markup.old_markup.push_str(&text);
                markup.old_markup.push_str("</span>");
            }
            DiffKind::Added => {
                markup.new_markup.push_str("<span class=\"diff-char-added\">");
                markup.new_markup.push_str(&text);
                markup.new_markup.push_str("</span>");
            }
        }
    }
    markup
}

/// Render a line diff as one `<div class="diff-line {type}">` block per line.
pub fn to_html<E>(script: &DiffScript, escape: E) -> String
where
    E: Fn(&str) -> String,
{
    let mut html = String::new();
    for item in script {
        let content = escape(&item.content);
        let content = if content.is_empty() {
            EMPTY_LINE_PLACEHOLDER
        } else {
            content.as_str()
        };
        html.push_str(&format!(
            "<div class=\"diff-line {}\">{}</div>",
            item.kind, content
        ));
    }
    html
}
