//! Prompt storage for promptshelf.
//!
//! Prompts are JSON records, one file per prompt, each carrying its own
//! version history. Deleting a prompt or a history entry moves it to a
//! recycle bin from which it can be restored or purged.
//!
//! # Record Types
//!
//! - [`Prompt`] -- a prompt with tags, timestamps and [`HistoryEntry`] list
//! - [`DeletedVersion`] -- a history entry removed from its prompt
//! - [`RecycleItem`] -- either of the above, as stored in the recycle bin
//!
//! # Storage Backends
//!
//! All backends implement the [`PromptStore`] trait:
//!
//! - [`FsPromptStore`] -- `prompts/` and `recycle_bin/` directories of JSON files
//! - [`InMemoryPromptStore`] -- `HashMap`-based store for tests and embedding
//!
//! [`Library`] implements the editor's operations on top of any backend and
//! records a diff summary for each content change.
//!
//! # Design Rules
//!
//! 1. Ids become file names, so every id is validated before touching disk.
//! 2. Files are written to a temporary file and renamed into place.
//! 3. One unreadable record never hides the others: listing skips it with a warning.
//! 4. There are no cross-file transactions; a crash between two writes may
//!    leave a record in both directories.

pub mod error;
pub mod fs;
pub mod ids;
pub mod library;
pub mod limits;
pub mod memory;
pub mod record;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsPromptStore;
pub use ids::validate_id;
pub use library::{Library, VersionComparison, VersionRef};
pub use limits::DiffLimits;
pub use memory::InMemoryPromptStore;
pub use record::{
    DeletedVersion, HistoryEntry, NewPrompt, Prompt, PromptPatch, RecycleItem, VersionTag,
};
pub use traits::PromptStore;
