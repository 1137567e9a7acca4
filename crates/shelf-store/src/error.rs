/// Errors from prompt storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No prompt with this id.
    #[error("prompt not found: {0}")]
    PromptNotFound(String),

    /// No recycle bin item with this id.
    #[error("recycle bin item not found: {0}")]
    RecycleItemNotFound(String),

    /// History index out of range.
    #[error("version {index} not found in prompt {id}")]
    VersionNotFound { id: String, index: usize },

    /// A version reference that is neither `current`, `previous` nor an index.
    #[error("invalid version reference: {0:?}")]
    InvalidVersionRef(String),

    /// A deleted version cannot be restored because its prompt is gone.
    #[error("prompt {prompt_id} no longer exists; cannot restore version")]
    ParentMissing { prompt_id: String },

    /// Restoring would overwrite a live prompt with the same id.
    #[error("prompt already exists: {0}")]
    AlreadyExists(String),

    /// The id cannot be used as a record file name.
    #[error("invalid id {id:?}: {reason}")]
    InvalidId { id: String, reason: String },

    /// Input exceeds the configured diff limits.
    #[error("{what} too large: {actual} exceeds limit of {limit}")]
    TooLarge {
        what: &'static str,
        actual: usize,
        limit: usize,
    },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
