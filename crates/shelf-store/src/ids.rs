//! Record id validation.
//!
//! Ids are used verbatim as file names, so they are restricted to:
//! - ASCII letters, digits, `-` and `_`
//! - between 1 and [`MAX_ID_LEN`] characters
//!
//! This rules out path separators, `..` and anything a filesystem might
//! interpret.

use crate::error::{StoreError, StoreResult};

/// Longest accepted id.
pub const MAX_ID_LEN: usize = 128;

/// Validate a record id, returning `Ok(())` if it is safe to use as a file stem.
///
/// # Examples
///
/// ```
/// use shelf_store::validate_id;
///
/// assert!(validate_id("0b6f3c1e-8d7a-4f7e-9c55-3f7b9a1d2e4c").is_ok());
/// assert!(validate_id("").is_err());
/// assert!(validate_id("../etc/passwd").is_err());
/// ```
pub fn validate_id(id: &str) -> StoreResult<()> {
    if id.is_empty() {
        return Err(invalid(id, "id must not be empty"));
    }

    if id.len() > MAX_ID_LEN {
        return Err(invalid(id, &format!("id longer than {MAX_ID_LEN} characters")));
    }

    if let Some(ch) = id
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_'))
    {
        return Err(invalid(id, &format!("contains forbidden character: {ch:?}")));
    }

    Ok(())
}

fn invalid(id: &str, reason: &str) -> StoreError {
    StoreError::InvalidId {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}
