use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// A stored prompt and its version history.
///
/// The current text lives in `content`; earlier texts are in `history`,
/// oldest first, with `version` equal to the entry's index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Set while the prompt sits in the recycle bin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Prompt {
    /// A fresh prompt with no history.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags,
            created_at: now,
            updated_at: now,
            history: Vec::new(),
            deleted_at: None,
        }
    }

    /// Renumber history entries so each `version` equals its index.
    pub fn renumber_history(&mut self) {
        for (index, entry) in self.history.iter_mut().enumerate() {
            entry.version = index;
        }
    }
}

/// A previous text of a prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub version: usize,
    pub content: String,
    /// When this text was last saved as the current content.
    pub timestamp: DateTime<Utc>,
    /// Summary of the change that replaced this text.
    #[serde(default)]
    pub changes: String,
}

// ---------------------------------------------------------------------------
// Recycle bin
// ---------------------------------------------------------------------------

/// Marker serialized as `"type": "version"` on deleted versions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionTag {
    #[default]
    #[serde(rename = "version")]
    Version,
}

/// A history entry removed from its prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedVersion {
    #[serde(rename = "type")]
    pub kind: VersionTag,
    pub id: String,
    pub prompt_id: String,
    pub prompt_title: String,
    pub version: usize,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub deleted_at: DateTime<Utc>,
}

/// Anything held in the recycle bin.
///
/// Untagged on the wire: deleted versions carry `"type": "version"`, deleted
/// prompts are plain prompt records with `deletedAt` set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecycleItem {
    Version(DeletedVersion),
    Prompt(Prompt),
}

impl RecycleItem {
    pub fn id(&self) -> &str {
        match self {
            Self::Version(version) => &version.id,
            Self::Prompt(prompt) => &prompt.id,
        }
    }

    /// When the item entered the recycle bin, if known.
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Version(version) => Some(version.deleted_at),
            Self::Prompt(prompt) => prompt.deleted_at,
        }
    }

    /// File stem used by the filesystem backend.
    pub fn file_stem(&self) -> String {
        match self {
            Self::Version(version) => format!("version_{}", version.id),
            Self::Prompt(prompt) => prompt.id.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Fields accepted when creating a prompt. Unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPrompt {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Partial update of a prompt. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Summary to record for a content change instead of the computed one.
    pub changes: Option<String>,
    /// Replaces the whole history.
    pub history: Option<Vec<HistoryEntry>>,
}
