//! Editor operations over a [`PromptStore`].
//!
//! The library owns every rule the backends know nothing about: title
//! de-duplication, history bookkeeping with diff summaries, soft deletion into
//! the recycle bin and restoring from it.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shelf_diff::{diff_lines, similarity, summarize, DiffScript};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::ids::validate_id;
use crate::limits::DiffLimits;
use crate::record::{
    DeletedVersion, HistoryEntry, NewPrompt, Prompt, PromptPatch, RecycleItem, VersionTag,
};
use crate::traits::PromptStore;

/// Title given to prompts created without one.
pub const DEFAULT_TITLE: &str = "Untitled Prompt";
/// Change summary recorded when the replaced content was empty.
pub const INITIAL_VERSION: &str = "initial version";
/// Change summary recorded when the texts exceed the diff limits.
pub const CONTENT_UPDATED: &str = "content updated";

// ---------------------------------------------------------------------------
// Version references
// ---------------------------------------------------------------------------

/// One side of a version comparison.
///
/// Written as `current`, `previous` (the newest history entry) or a 0-based
/// history index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VersionRef {
    Current,
    Previous,
    History(usize),
}

impl fmt::Display for VersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => f.write_str("current"),
            Self::Previous => f.write_str("previous"),
            Self::History(index) => write!(f, "{index}"),
        }
    }
}

impl FromStr for VersionRef {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Self::Current),
            "previous" => Ok(Self::Previous),
            _ => s
                .strip_prefix('v')
                .unwrap_or(s)
                .parse()
                .map(Self::History)
                .map_err(|_| StoreError::InvalidVersionRef(s.to_string())),
        }
    }
}

impl Serialize for VersionRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Result of [`Library::compare`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionComparison {
    pub from: VersionRef,
    pub to: VersionRef,
    pub items: DiffScript,
    pub summary: String,
    pub similarity: u8,
}

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

/// Prompt library on top of a storage backend.
pub struct Library<S> {
    store: S,
    limits: DiffLimits,
}

impl<S: PromptStore> Library<S> {
    /// Library with the default diff limits.
    pub fn new(store: S) -> Self {
        Self::with_limits(store, DiffLimits::default())
    }

    pub fn with_limits(store: S, limits: DiffLimits) -> Self {
        Self { store, limits }
    }

    pub fn limits(&self) -> DiffLimits {
        self.limits
    }

    // ---- Prompt operations ----

    /// All live prompts, most recently updated first.
    pub fn list(&self) -> StoreResult<Vec<Prompt>> {
        let mut prompts = self.store.list_prompts()?;
        prompts.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(prompts)
    }

    pub fn get(&self, id: &str) -> StoreResult<Prompt> {
        self.store
            .read_prompt(id)?
            .ok_or_else(|| StoreError::PromptNotFound(id.to_string()))
    }

    /// Create a prompt with a fresh id and empty history.
    ///
    /// A title already in use gets the smallest free numeric suffix
    /// (`"Notes"`, `"Notes 2"`, `"Notes 3"`, ...).
    pub fn create(&self, new: NewPrompt) -> StoreResult<Prompt> {
        let base = new
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let title = self.unique_title(&base)?;

        let prompt = Prompt::new(
            Uuid::new_v4().to_string(),
            title,
            new.content.unwrap_or_default(),
            new.tags.unwrap_or_default(),
        );
        self.store.write_prompt(&prompt)?;
        info!(id = %prompt.id, title = %prompt.title, "created prompt");
        Ok(prompt)
    }

    fn unique_title(&self, base: &str) -> StoreResult<String> {
        let taken: Vec<String> = self
            .store
            .list_prompts()?
            .into_iter()
            .map(|p| p.title)
            .collect();
        let is_taken = |title: &str| taken.iter().any(|t| t == title);

        if !is_taken(base) {
            return Ok(base.to_string());
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{base} {counter}");
            if !is_taken(&candidate) {
                return Ok(candidate);
            }
            counter += 1;
        }
    }

    /// Apply a partial update.
    ///
    /// A content change pushes the replaced text onto the history together
    /// with a summary of the change.
    pub fn update(&self, id: &str, patch: PromptPatch) -> StoreResult<Prompt> {
        let mut prompt = self.get(id)?;

        if let Some(content) = patch.content {
            if content != prompt.content {
                let changes = match patch.changes {
                    Some(changes) => changes,
                    None => self.change_summary(&prompt.content, &content),
                };
                debug!(id, version = prompt.history.len(), %changes, "recording history entry");
                let old = std::mem::replace(&mut prompt.content, content);
                prompt.history.push(HistoryEntry {
                    version: prompt.history.len(),
                    content: old,
                    timestamp: prompt.updated_at,
                    changes,
                });
            }
        }
        if let Some(title) = patch.title {
            prompt.title = title;
        }
        if let Some(tags) = patch.tags {
            prompt.tags = tags;
        }
        if let Some(history) = patch.history {
            prompt.history = history;
        }
        prompt.updated_at = Utc::now();

        self.store.write_prompt(&prompt)?;
        Ok(prompt)
    }

    fn change_summary(&self, old: &str, new: &str) -> String {
        if old.is_empty() {
            return INITIAL_VERSION.to_string();
        }
        if self.limits.check_lines(old, new).is_err() {
            return CONTENT_UPDATED.to_string();
        }
        summarize(&diff_lines(old, new))
    }

    /// Overwrite the whole record as sent by the editor.
    pub fn autosave(&self, id: &str, mut prompt: Prompt) -> StoreResult<Prompt> {
        validate_id(id)?;
        prompt.id = id.to_string();
        prompt.deleted_at = None;
        prompt.updated_at = Utc::now();
        self.store.write_prompt(&prompt)?;
        debug!(id, title = %prompt.title, "autosaved prompt");
        Ok(prompt)
    }

    /// Move a prompt to the recycle bin.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let mut prompt = self.get(id)?;
        prompt.deleted_at = Some(Utc::now());
        self.store.write_recycled(&RecycleItem::Prompt(prompt))?;
        self.store.delete_prompt(id)?;
        info!(id, "moved prompt to recycle bin");
        Ok(())
    }

    // ---- History operations ----

    /// Move history entry `index` to the recycle bin and renumber the rest.
    pub fn delete_version(&self, id: &str, index: usize) -> StoreResult<Prompt> {
        let mut prompt = self.get(id)?;
        if index >= prompt.history.len() {
            return Err(StoreError::VersionNotFound {
                id: id.to_string(),
                index,
            });
        }

        let entry = prompt.history.remove(index);
        let deleted = DeletedVersion {
            kind: VersionTag::Version,
            id: Uuid::new_v4().to_string(),
            prompt_id: prompt.id.clone(),
            prompt_title: prompt.title.clone(),
            version: entry.version,
            content: entry.content,
            timestamp: entry.timestamp,
            deleted_at: Utc::now(),
        };
        self.store.write_recycled(&RecycleItem::Version(deleted))?;

        prompt.renumber_history();
        self.store.write_prompt(&prompt)?;
        info!(id, index, remaining = prompt.history.len(), "deleted history entry");
        Ok(prompt)
    }

    /// Diff two versions of a prompt.
    pub fn compare(&self, id: &str, from: VersionRef, to: VersionRef) -> StoreResult<VersionComparison> {
        let prompt = self.get(id)?;
        let old = resolve(&prompt, from)?;
        let new = resolve(&prompt, to)?;
        self.limits.check_lines(old, new)?;

        let items = diff_lines(old, new);
        Ok(VersionComparison {
            from,
            to,
            summary: summarize(&items),
            similarity: similarity(old, new),
            items,
        })
    }

    // ---- Recycle bin operations ----

    /// Recycle bin items, most recently deleted first.
    pub fn recycle_bin(&self) -> StoreResult<Vec<RecycleItem>> {
        let mut items = self.store.list_recycled()?;
        items.sort_by(|a, b| {
            b.deleted_at()
                .cmp(&a.deleted_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(items)
    }

    /// Restore a recycle bin item and return the prompt it landed in.
    pub fn restore(&self, id: &str) -> StoreResult<Prompt> {
        let item = self
            .store
            .read_recycled(id)?
            .ok_or_else(|| StoreError::RecycleItemNotFound(id.to_string()))?;

        let prompt = match item {
            RecycleItem::Prompt(mut prompt) => {
                if self.store.read_prompt(&prompt.id)?.is_some() {
                    return Err(StoreError::AlreadyExists(prompt.id));
                }
                prompt.deleted_at = None;
                prompt.updated_at = Utc::now();
                prompt
            }
            RecycleItem::Version(version) => {
                let mut parent = self.store.read_prompt(&version.prompt_id)?.ok_or_else(|| {
                    StoreError::ParentMissing {
                        prompt_id: version.prompt_id.clone(),
                    }
                })?;
                parent.history.push(HistoryEntry {
                    version: parent.history.len(),
                    content: version.content,
                    timestamp: version.timestamp,
                    changes: format!("restored from recycle bin (was version {})", version.version),
                });
                parent.updated_at = Utc::now();
                parent
            }
        };

        self.store.write_prompt(&prompt)?;
        self.store.delete_recycled(id)?;
        info!(id, prompt = %prompt.id, "restored from recycle bin");
        Ok(prompt)
    }

    /// Permanently delete one recycle bin item.
    pub fn purge(&self, id: &str) -> StoreResult<()> {
        if !self.store.delete_recycled(id)? {
            return Err(StoreError::RecycleItemNotFound(id.to_string()));
        }
        info!(id, "purged recycle bin item");
        Ok(())
    }

    /// Permanently delete everything in the recycle bin.
    pub fn empty_recycle_bin(&self) -> StoreResult<usize> {
        self.store.clear_recycled()
    }
}

impl<S> fmt::Debug for Library<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("store", &self.store)
            .field("limits", &self.limits)
            .finish()
    }
}

/// Text of a version. `previous` on a prompt without history is the empty
/// text that preceded the first save.
fn resolve(prompt: &Prompt, version: VersionRef) -> StoreResult<&str> {
    match version {
        VersionRef::Current => Ok(&prompt.content),
        VersionRef::Previous => Ok(prompt
            .history
            .last()
            .map(|h| h.content.as_str())
            .unwrap_or("")),
        VersionRef::History(index) => prompt
            .history
            .get(index)
            .map(|h| h.content.as_str())
            .ok_or_else(|| StoreError::VersionNotFound {
                id: prompt.id.clone(),
                index,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryPromptStore;

    fn library() -> Library<InMemoryPromptStore> {
        Library::new(InMemoryPromptStore::new())
    }

    fn create(lib: &Library<InMemoryPromptStore>, title: &str, content: &str) -> Prompt {
        lib.create(NewPrompt {
            title: Some(title.into()),
            content: Some(content.into()),
            tags: None,
        })
        .unwrap()
    }

    fn set_content(lib: &Library<InMemoryPromptStore>, id: &str, content: &str) -> Prompt {
        lib.update(
            id,
            PromptPatch {
                content: Some(content.into()),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn create_defaults() {
        let lib = library();
        let prompt = lib.create(NewPrompt::default()).unwrap();
        assert_eq!(prompt.title, DEFAULT_TITLE);
        assert_eq!(prompt.content, "");
        assert!(prompt.history.is_empty());
        assert!(Uuid::parse_str(&prompt.id).is_ok());
    }

    #[test]
    fn create_picks_smallest_free_suffix() {
        let lib = library();
        assert_eq!(create(&lib, "Notes", "").title, "Notes");
        assert_eq!(create(&lib, "Notes", "").title, "Notes 2");
        assert_eq!(create(&lib, "Notes", "").title, "Notes 3");

        let second = lib.list().unwrap().into_iter().find(|p| p.title == "Notes 2").unwrap();
        lib.delete(&second.id).unwrap();
        assert_eq!(create(&lib, "Notes", "").title, "Notes 2");
    }

    #[test]
    fn list_is_most_recent_first() {
        let lib = library();
        let a = create(&lib, "a", "");
        let b = create(&lib, "b", "");
        set_content(&lib, &a.id, "touched");

        let ids: Vec<String> = lib.list().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn list_breaks_timestamp_ties_by_id() {
        let store = InMemoryPromptStore::new();
        let stamp = Utc::now();
        for id in ["c", "a", "b"] {
            let mut prompt = Prompt::new(id, id, "", vec![]);
            prompt.updated_at = stamp;
            store.write_prompt(&prompt).unwrap();
        }
        let lib = Library::new(store);

        let ids: Vec<String> = lib.list().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn get_missing_prompt() {
        let lib = library();
        assert!(matches!(lib.get("nope"), Err(StoreError::PromptNotFound(_))));
    }

    #[test]
    fn update_records_diff_summary() {
        let lib = library();
        let prompt = create(&lib, "t", "a\nb\nc");
        let updated = set_content(&lib, &prompt.id, "a\nx\nc");

        assert_eq!(updated.content, "a\nx\nc");
        assert_eq!(updated.history.len(), 1);
        let entry = &updated.history[0];
        assert_eq!(entry.version, 0);
        assert_eq!(entry.content, "a\nb\nc");
        assert_eq!(entry.changes, "+1 lines, -1 lines");
        assert_eq!(entry.timestamp, prompt.updated_at);
    }

    #[test]
    fn first_content_is_initial_version() {
        let lib = library();
        let prompt = create(&lib, "t", "");
        let updated = set_content(&lib, &prompt.id, "hello");
        assert_eq!(updated.history[0].changes, INITIAL_VERSION);
    }

    #[test]
    fn unchanged_content_adds_no_history() {
        let lib = library();
        let prompt = create(&lib, "t", "same");
        let updated = lib
            .update(
                &prompt.id,
                PromptPatch {
                    title: Some("renamed".into()),
                    content: Some("same".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated.history.is_empty());
        assert_eq!(updated.title, "renamed");
    }

    #[test]
    fn explicit_changes_override_summary() {
        let lib = library();
        let prompt = create(&lib, "t", "one");
        let updated = lib
            .update(
                &prompt.id,
                PromptPatch {
                    content: Some("two".into()),
                    changes: Some("rewrote it".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.history[0].changes, "rewrote it");
    }

    #[test]
    fn oversized_update_falls_back_to_plain_summary() {
        let lib = Library::with_limits(
            InMemoryPromptStore::new(),
            DiffLimits {
                max_lines: 2,
                max_chars: 10,
            },
        );
        let prompt = lib
            .create(NewPrompt {
                content: Some("a".into()),
                ..Default::default()
            })
            .unwrap();
        let updated = lib
            .update(
                &prompt.id,
                PromptPatch {
                    content: Some("a\nb\nc".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.history[0].changes, CONTENT_UPDATED);
    }

    #[test]
    fn autosave_forces_path_id() {
        let lib = library();
        let prompt = create(&lib, "t", "x");
        let mut edited = prompt.clone();
        edited.id = "something-else".into();
        edited.content = "edited".into();

        let saved = lib.autosave(&prompt.id, edited).unwrap();
        assert_eq!(saved.id, prompt.id);
        assert_eq!(lib.get(&prompt.id).unwrap().content, "edited");
        assert_eq!(lib.list().unwrap().len(), 1);
    }

    #[test]
    fn delete_and_restore_prompt() {
        let lib = library();
        let prompt = create(&lib, "t", "x");
        lib.delete(&prompt.id).unwrap();

        assert!(lib.list().unwrap().is_empty());
        let bin = lib.recycle_bin().unwrap();
        assert_eq!(bin.len(), 1);
        assert!(bin[0].deleted_at().is_some());

        let restored = lib.restore(&prompt.id).unwrap();
        assert!(restored.deleted_at.is_none());
        assert_eq!(restored.content, "x");
        assert!(lib.recycle_bin().unwrap().is_empty());
    }

    #[test]
    fn restore_over_live_prompt_conflicts() {
        let lib = library();
        let prompt = create(&lib, "t", "x");
        lib.delete(&prompt.id).unwrap();
        lib.autosave(&prompt.id, prompt.clone()).unwrap();
        assert!(matches!(
            lib.restore(&prompt.id),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn delete_version_renumbers_history() {
        let lib = library();
        let prompt = create(&lib, "t", "v0");
        for content in ["v1", "v2", "v3"] {
            set_content(&lib, &prompt.id, content);
        }

        let updated = lib.delete_version(&prompt.id, 1).unwrap();
        let contents: Vec<&str> = updated.history.iter().map(|h| h.content.as_str()).collect();
        assert_eq!(contents, vec!["v0", "v2"]);
        let versions: Vec<usize> = updated.history.iter().map(|h| h.version).collect();
        assert_eq!(versions, vec![0, 1]);

        match &lib.recycle_bin().unwrap()[0] {
            RecycleItem::Version(v) => {
                assert_eq!(v.version, 1);
                assert_eq!(v.content, "v1");
                assert_eq!(v.prompt_id, prompt.id);
            }
            other => panic!("expected a deleted version, got {other:?}"),
        }
    }

    #[test]
    fn delete_version_out_of_range() {
        let lib = library();
        let prompt = create(&lib, "t", "x");
        assert!(matches!(
            lib.delete_version(&prompt.id, 0),
            Err(StoreError::VersionNotFound { index: 0, .. })
        ));
    }

    #[test]
    fn restored_version_is_appended() {
        let lib = library();
        let prompt = create(&lib, "t", "v0");
        set_content(&lib, &prompt.id, "v1");
        set_content(&lib, &prompt.id, "v2");
        lib.delete_version(&prompt.id, 0).unwrap();

        let item_id = lib.recycle_bin().unwrap()[0].id().to_string();
        let restored = lib.restore(&item_id).unwrap();
        assert_eq!(restored.id, prompt.id);
        assert_eq!(restored.history.len(), 2);
        let last = restored.history.last().unwrap();
        assert_eq!(last.version, 1);
        assert_eq!(last.content, "v0");
        assert_eq!(last.changes, "restored from recycle bin (was version 0)");
    }

    #[test]
    fn version_restore_needs_parent() {
        let lib = library();
        let prompt = create(&lib, "t", "v0");
        set_content(&lib, &prompt.id, "v1");
        lib.delete_version(&prompt.id, 0).unwrap();
        let item_id = lib
            .recycle_bin()
            .unwrap()
            .into_iter()
            .find(|i| matches!(i, RecycleItem::Version(_)))
            .unwrap()
            .id()
            .to_string();

        lib.delete(&prompt.id).unwrap();
        lib.purge(&prompt.id).unwrap();
        assert!(matches!(
            lib.restore(&item_id),
            Err(StoreError::ParentMissing { .. })
        ));
    }

    #[test]
    fn purge_and_empty() {
        let lib = library();
        let a = create(&lib, "a", "");
        let b = create(&lib, "b", "");
        lib.delete(&a.id).unwrap();
        lib.delete(&b.id).unwrap();

        lib.purge(&a.id).unwrap();
        assert!(matches!(
            lib.purge(&a.id),
            Err(StoreError::RecycleItemNotFound(_))
        ));
        assert_eq!(lib.empty_recycle_bin().unwrap(), 1);
        assert!(lib.recycle_bin().unwrap().is_empty());
    }

    #[test]
    fn compare_versions() {
        let lib = library();
        let prompt = create(&lib, "t", "a\nb\nc");
        set_content(&lib, &prompt.id, "a\nx\nc");

        let cmp = lib
            .compare(&prompt.id, VersionRef::Previous, VersionRef::Current)
            .unwrap();
        assert_eq!(cmp.summary, "+1 lines, -1 lines");
        assert_eq!(cmp.similarity, 67);
        assert_eq!(cmp.items.len(), 4);

        let same = lib
            .compare(&prompt.id, VersionRef::History(0), VersionRef::History(0))
            .unwrap();
        assert_eq!(same.similarity, 100);
        assert!(!same.items.has_changes());
    }

    #[test]
    fn compare_previous_without_history() {
        let lib = library();
        let prompt = create(&lib, "t", "one\ntwo");
        let cmp = lib
            .compare(&prompt.id, VersionRef::Previous, VersionRef::Current)
            .unwrap();
        assert_eq!(cmp.items.additions(), 2);
        assert_eq!(cmp.similarity, 0);
    }

    #[test]
    fn compare_unknown_version() {
        let lib = library();
        let prompt = create(&lib, "t", "x");
        assert!(matches!(
            lib.compare(&prompt.id, VersionRef::History(3), VersionRef::Current),
            Err(StoreError::VersionNotFound { index: 3, .. })
        ));
    }

    #[test]
    fn version_ref_parsing() {
        assert_eq!("current".parse::<VersionRef>().unwrap(), VersionRef::Current);
        assert_eq!("previous".parse::<VersionRef>().unwrap(), VersionRef::Previous);
        assert_eq!("3".parse::<VersionRef>().unwrap(), VersionRef::History(3));
        assert_eq!("v2".parse::<VersionRef>().unwrap(), VersionRef::History(2));
        assert!("latest".parse::<VersionRef>().is_err());
        assert!("-1".parse::<VersionRef>().is_err());

        let json = serde_json::to_string(&VersionRef::History(4)).unwrap();
        assert_eq!(json, "\"4\"");
        let back: VersionRef = serde_json::from_str("\"current\"").unwrap();
        assert_eq!(back, VersionRef::Current);
    }
}
