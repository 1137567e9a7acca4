//! Directory-of-JSON-files backend.
//!
//! On-disk layout under the data directory:
//! ```text
//! prompts/<id>.json                 live prompts
//! recycle_bin/<id>.json             deleted prompts
//! recycle_bin/version_<id>.json     deleted history entries
//! ```
//! Records are pretty-printed JSON. Writes go to a temporary file in the
//! target directory and are renamed into place, so a reader never sees a
//! half-written record.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::ids::validate_id;
use crate::record::{Prompt, RecycleItem};
use crate::traits::PromptStore;

/// Name of the live prompts directory.
pub const PROMPTS_DIR: &str = "prompts";
/// Name of the recycle bin directory.
pub const RECYCLE_DIR: &str = "recycle_bin";

const VERSION_PREFIX: &str = "version_";

/// Prompt store backed by two directories of JSON files.
#[derive(Clone, Debug)]
pub struct FsPromptStore {
    prompts_dir: PathBuf,
    recycle_dir: PathBuf,
}

impl FsPromptStore {
    /// Open (or create) the store under `data_dir`.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        let prompts_dir = data_dir.join(PROMPTS_DIR);
        let recycle_dir = data_dir.join(RECYCLE_DIR);
        fs::create_dir_all(&prompts_dir)?;
        fs::create_dir_all(&recycle_dir)?;
        info!(data_dir = %data_dir.display(), "opened prompt store");
        Ok(Self {
            prompts_dir,
            recycle_dir,
        })
    }

    pub fn prompts_dir(&self) -> &Path {
        &self.prompts_dir
    }

    pub fn recycle_dir(&self) -> &Path {
        &self.recycle_dir
    }

    fn prompt_path(&self, id: &str) -> StoreResult<PathBuf> {
        validate_id(id)?;
        Ok(self.prompts_dir.join(format!("{id}.json")))
    }

    /// Candidate paths of a recycle item: deleted prompt, then deleted version.
    fn recycled_paths(&self, id: &str) -> StoreResult<[PathBuf; 2]> {
        validate_id(id)?;
        Ok([
            self.recycle_dir.join(format!("{id}.json")),
            self.recycle_dir.join(format!("{VERSION_PREFIX}{id}.json")),
        ])
    }
}

impl PromptStore for FsPromptStore {
    fn list_prompts(&self) -> StoreResult<Vec<Prompt>> {
        list_json(&self.prompts_dir)
    }

    fn read_prompt(&self, id: &str) -> StoreResult<Option<Prompt>> {
        read_json(&self.prompt_path(id)?)
    }

    fn write_prompt(&self, prompt: &Prompt) -> StoreResult<()> {
        let path = self.prompt_path(&prompt.id)?;
        write_json(&self.prompts_dir, &path, prompt)
    }

    fn delete_prompt(&self, id: &str) -> StoreResult<bool> {
        remove_file(&self.prompt_path(id)?)
    }

    fn list_recycled(&self) -> StoreResult<Vec<RecycleItem>> {
        list_json(&self.recycle_dir)
    }

    fn read_recycled(&self, id: &str) -> StoreResult<Option<RecycleItem>> {
        for path in self.recycled_paths(id)? {
            if let Some(item) = read_json(&path)? {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn write_recycled(&self, item: &RecycleItem) -> StoreResult<()> {
        validate_id(item.id())?;
        let path = self.recycle_dir.join(format!("{}.json", item.file_stem()));
        write_json(&self.recycle_dir, &path, item)
    }

    fn delete_recycled(&self, id: &str) -> StoreResult<bool> {
        let mut removed = false;
        for path in self.recycled_paths(id)? {
            removed |= remove_file(&path)?;
        }
        Ok(removed)
    }

    fn clear_recycled(&self) -> StoreResult<usize> {
        let mut removed = 0;
        for path in json_files(&self.recycle_dir)? {
            if remove_file(&path)? {
                removed += 1;
            }
        }
        info!(removed, "emptied recycle bin");
        Ok(removed)
    }
}

/// `.json` files directly inside `dir`, sorted by name.
fn json_files(dir: &Path) -> StoreResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map(|e| e == "json").unwrap_or(false) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn list_json<T: DeserializeOwned>(dir: &Path) -> StoreResult<Vec<T>> {
    let mut records = Vec::new();
    for path in json_files(dir)? {
        let text = fs::read_to_string(&path)?;
        match serde_json::from_str(&text) {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping unreadable record {:?}: {}", path, e),
        }
    }
    Ok(records)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| StoreError::Serialization(format!("{}: {e}", path.display())))
}

fn write_json<T: Serialize>(dir: &Path, path: &Path, value: &T) -> StoreResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = text.len(), "wrote record");
    Ok(())
}

fn remove_file(path: &Path) -> StoreResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
