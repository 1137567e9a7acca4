use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Size ceilings applied before handing text to the diff engine.
///
/// The engine's DP table is `O(m * n)`, so both the line diff and the
/// character diff are bounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffLimits {
    /// Maximum line count of either side of a line diff.
    pub max_lines: usize,
    /// Maximum character count of either side of a character diff.
    pub max_chars: usize,
}

impl Default for DiffLimits {
    fn default() -> Self {
        Self {
            max_lines: 5000,
            max_chars: 4000,
        }
    }
}

impl DiffLimits {
    /// Check both texts of a line diff.
    pub fn check_lines(&self, old: &str, new: &str) -> StoreResult<()> {
        let lines = line_count(old).max(line_count(new));
        if lines > self.max_lines {
            return Err(StoreError::TooLarge {
                what: "text",
                actual: lines,
                limit: self.max_lines,
            });
        }
        Ok(())
    }

    /// Check both strings of a character diff.
    pub fn check_chars(&self, old: &str, new: &str) -> StoreResult<()> {
        let chars = old.chars().count().max(new.chars().count());
        if chars > self.max_chars {
            return Err(StoreError::TooLarge {
                what: "line",
                actual: chars,
                limit: self.max_chars,
            });
        }
        Ok(())
    }
}

/// Line count under the diff engine's splitting rule.
fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}
