use crate::error::StoreResult;
use crate::record::{Prompt, RecycleItem};

/// Persistence for prompts and the recycle bin.
///
/// Backends store records verbatim; ordering, history bookkeeping and
/// timestamps are the [`Library`](crate::Library)'s job.
///
/// All implementations must satisfy these invariants:
/// - Ids are validated before they reach storage; an invalid id is an error,
///   never a miss.
/// - Reads of missing records return `Ok(None)`, not an error.
/// - A write fully replaces any record with the same id.
/// - All I/O errors are propagated, never silently ignored.
pub trait PromptStore: Send + Sync {
    /// All live prompts, in no particular order.
    fn list_prompts(&self) -> StoreResult<Vec<Prompt>>;

    /// Read a live prompt by id.
    fn read_prompt(&self, id: &str) -> StoreResult<Option<Prompt>>;

    /// Create or replace a live prompt.
    fn write_prompt(&self, prompt: &Prompt) -> StoreResult<()>;

    /// Delete a live prompt. Returns `true` if it existed.
    fn delete_prompt(&self, id: &str) -> StoreResult<bool>;

    /// All recycle bin items, in no particular order.
    fn list_recycled(&self) -> StoreResult<Vec<RecycleItem>>;

    /// Read a recycle bin item by id.
    fn read_recycled(&self, id: &str) -> StoreResult<Option<RecycleItem>>;

    /// Create or replace a recycle bin item.
    fn write_recycled(&self, item: &RecycleItem) -> StoreResult<()>;

    /// Delete a recycle bin item. Returns `true` if it existed.
    fn delete_recycled(&self, id: &str) -> StoreResult<bool>;

    /// Delete every recycle bin item and return how many were removed.
    ///
    /// Default implementation lists and deletes one by one.
    fn clear_recycled(&self) -> StoreResult<usize> {
        let mut removed = 0;
        for item in self.list_recycled()? {
            if self.delete_recycled(item.id())? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
