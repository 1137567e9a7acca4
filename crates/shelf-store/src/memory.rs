use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StoreResult;
use crate::ids::validate_id;
use crate::record::{Prompt, RecycleItem};
use crate::traits::PromptStore;

/// In-memory, HashMap-based prompt store.
///
/// Intended for tests and embedding. Records are held behind `RwLock`s and
/// cloned on read/write.
pub struct InMemoryPromptStore {
    prompts: RwLock<HashMap<String, Prompt>>,
    recycled: RwLock<HashMap<String, RecycleItem>>,
}

impl InMemoryPromptStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            prompts: RwLock::new(HashMap::new()),
            recycled: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live prompts.
    pub fn prompt_count(&self) -> usize {
        self.prompts.read().expect("lock poisoned").len()
    }

    /// Number of recycle bin items.
    pub fn recycled_count(&self) -> usize {
        self.recycled.read().expect("lock poisoned").len()
    }
}

impl Default for InMemoryPromptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptStore for InMemoryPromptStore {
    fn list_prompts(&self) -> StoreResult<Vec<Prompt>> {
        let map = self.prompts.read().expect("lock poisoned");
        Ok(map.values().cloned().collect())
    }

    fn read_prompt(&self, id: &str) -> StoreResult<Option<Prompt>> {
        validate_id(id)?;
        let map = self.prompts.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    fn write_prompt(&self, prompt: &Prompt) -> StoreResult<()> {
        validate_id(&prompt.id)?;
        let mut map = self.prompts.write().expect("lock poisoned");
        map.insert(prompt.id.clone(), prompt.clone());
        Ok(())
    }

    fn delete_prompt(&self, id: &str) -> StoreResult<bool> {
        validate_id(id)?;
        let mut map = self.prompts.write().expect("lock poisoned");
        Ok(map.remove(id).is_some())
    }

    fn list_recycled(&self) -> StoreResult<Vec<RecycleItem>> {
        let map = self.recycled.read().expect("lock poisoned");
        Ok(map.values().cloned().collect())
    }

    fn read_recycled(&self, id: &str) -> StoreResult<Option<RecycleItem>> {
        validate_id(id)?;
        let map = self.recycled.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    fn write_recycled(&self, item: &RecycleItem) -> StoreResult<()> {
        validate_id(item.id())?;
        let mut map = self.recycled.write().expect("lock poisoned");
        map.insert(item.id().to_string(), item.clone());
        Ok(())
    }

    fn delete_recycled(&self, id: &str) -> StoreResult<bool> {
        validate_id(id)?;
        let mut map = self.recycled.write().expect("lock poisoned");
        Ok(map.remove(id).is_some())
    }

    fn clear_recycled(&self) -> StoreResult<usize> {
        let mut map = self.recycled.write().expect("lock poisoned");
        let removed = map.len();
        map.clear();
        Ok(removed)
    }
}

impl std::fmt::Debug for InMemoryPromptStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPromptStore")
            .field("prompt_count", &self.prompt_count())
            .field("recycled_count", &self.recycled_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn make_prompt(id: &str) -> Prompt {
        Prompt::new(id, format!("title {id}"), "content", vec![])
    }

    #[test]
    fn write_and_read_prompt() {
        let store = InMemoryPromptStore::new();
        store.write_prompt(&make_prompt("p1")).unwrap();
        let read_back = store.read_prompt("p1").unwrap().expect("should exist");
        assert_eq!(read_back.title, "title p1");
        assert_eq!(store.prompt_count(), 1);
    }

    #[test]
    fn read_missing_is_none() {
        let store = InMemoryPromptStore::new();
        assert!(store.read_prompt("missing").unwrap().is_none());
        assert!(store.read_recycled("missing").unwrap().is_none());
    }

    #[test]
    fn delete_reports_existence() {
        let store = InMemoryPromptStore::new();
        store.write_prompt(&make_prompt("p1")).unwrap();
        assert!(store.delete_prompt("p1").unwrap());
        assert!(!store.delete_prompt("p1").unwrap());
    }

    #[test]
    fn invalid_id_is_rejected() {
        let store = InMemoryPromptStore::new();
        assert!(matches!(
            store.read_prompt("../x"),
            Err(StoreError::InvalidId { .. })
        ));
        assert!(store.write_prompt(&make_prompt("a/b")).is_err());
    }

    #[test]
    fn clear_recycled_counts_items() {
        let store = InMemoryPromptStore::new();
        store
            .write_recycled(&RecycleItem::Prompt(make_prompt("p1")))
            .unwrap();
        store
            .write_recycled(&RecycleItem::Prompt(make_prompt("p2")))
            .unwrap();
        assert_eq!(store.clear_recycled().unwrap(), 2);
        assert_eq!(store.recycled_count(), 0);
    }

    #[test]
    fn debug_shows_counts() {
        let store = InMemoryPromptStore::new();
        store.write_prompt(&make_prompt("p1")).unwrap();
        let debug = format!("{:?}", store);
        assert!(debug.contains("InMemoryPromptStore"));
        assert!(debug.contains("prompt_count: 1"));
    }
}
