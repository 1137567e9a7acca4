//! Longest common subsequence over arbitrary items.
//!
//! The table is generic over the item type and an equality predicate, so the
//! line diff (comparison-key equality) and the character diff (exact
//! equality) share one construction and one set of backtraces.
//!
//! Tie-breaking in both backtraces is fixed. Changing it reorders adjacent
//! added/removed blocks in every rendered diff.

/// A matched pair found while backtracking the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    /// Index into the old sequence (0-based).
    pub old_index: usize,
    /// Index into the new sequence (0-based).
    pub new_index: usize,
}

/// One step of a complete edit script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOp {
    /// Item present on both sides.
    Keep { old_index: usize, new_index: usize },
    /// Item only present in the new sequence.
    Insert { new_index: usize },
    /// Item only present in the old sequence.
    Delete { old_index: usize },
}

/// Filled LCS dynamic-programming table.
///
/// `cell(i, j)` is the LCS length of the first `i` old items and the first
/// `j` new items. Storage is a flat row-major `(m + 1) * (n + 1)` buffer.
pub struct LcsTable<'a, T, F> {
    old: &'a [T],
    new: &'a [T],
    eq: F,
    cols: usize,
    cells: Vec<u32>,
}

impl<'a, T, F> LcsTable<'a, T, F>
where
    F: Fn(&T, &T) -> bool,
{
    /// Fill the table for `old` against `new` using `eq` as the match predicate.
    pub fn build(old: &'a [T], new: &'a [T], eq: F) -> Self {
        let cols = new.len() + 1;
        let mut cells = vec![0u32; (old.len() + 1) * cols];

        for i in 1..=old.len() {
            let row = i * cols;
            let prev_row = (i - 1) * cols;
            for j in 1..=new.len() {
                cells[row + j] = if eq(&old[i - 1], &new[j - 1]) {
                    cells[prev_row + j - 1] + 1
                } else {
                    cells[prev_row + j].max(cells[row + j - 1])
                };
            }
        }

        Self {
            old,
            new,
            eq,
            cols,
            cells,
        }
    }

    /// Length of the longest common subsequence.
    pub fn len(&self) -> usize {
        self.cell(self.old.len(), self.new.len()) as usize
    }

    /// Returns `true` if the sequences have nothing in common.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.cols + j]
    }

    fn matches(&self, i: usize, j: usize) -> bool {
        (self.eq)(&self.old[i], &self.new[j])
    }

    /// Backtrack to the matched pairs only, in ascending order.
    ///
    /// From `(m, n)`: on a match take the diagonal. Otherwise step up (drop an
    /// old item) only when `cell(i - 1, j) > cell(i, j - 1)`; on a tie step
    /// left (drop a new item).
    pub fn anchors(&self) -> Vec<Anchor> {
        let mut anchors = Vec::with_capacity(self.len());
        let (mut i, mut j) = (self.old.len(), self.new.len());

        while i > 0 && j > 0 {
            if self.matches(i - 1, j - 1) {
                anchors.push(Anchor {
                    old_index: i - 1,
                    new_index: j - 1,
                });
                i -= 1;
                j -= 1;
            } else if self.cell(i - 1, j) > self.cell(i, j - 1) {
                i -= 1;
            } else {
                j -= 1;
            }
        }

        anchors.reverse();
        anchors
    }

    /// Backtrack to a full edit script covering every item on both sides.
    ///
    /// From `(m, n)` until both indices reach zero: a match keeps the item;
    /// otherwise the new item is inserted when `cell(i, j - 1) >= cell(i - 1, j)`
    /// (or the old side is exhausted), else the old item is deleted.
    pub fn edit_script(&self) -> Vec<EditOp> {
        let mut ops = Vec::with_capacity(self.old.len() + self.new.len() - self.len());
        let (mut i, mut j) = (self.old.len(), self.new.len());

        while i > 0 || j > 0 {
            if i > 0 && j > 0 && self.matches(i - 1, j - 1) {
                ops.push(EditOp::Keep {
                    old_index: i - 1,
                    new_index: j - 1,
                });
                i -= 1;
                j -= 1;
            } else if j > 0 && (i == 0 || self.cell(i, j - 1) >= self.cell(i - 1, j)) {
                ops.push(EditOp::Insert { new_index: j - 1 });
                j -= 1;
            } else {
                ops.push(EditOp::Delete { old_index: i - 1 });
                i -= 1;
            }
        }

        ops.reverse();
        ops
    }
}

/// LCS length without a backtrace, keeping only two rows of the table.
///
/// Uses the same recurrence as [`LcsTable::build`], so for the same predicate
/// the result always equals [`LcsTable::len`].
pub fn lcs_len<T, F>(old: &[T], new: &[T], eq: F) -> usize
where
    F: Fn(&T, &T) -> bool,
{
    let mut prev = vec![0usize; new.len() + 1];
    let mut curr = vec![0usize; new.len() + 1];

    for a in old {
        for (j, b) in new.iter().enumerate() {
            curr[j + 1] = if eq(a, b) {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[new.len()]
}
