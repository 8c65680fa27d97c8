//! Branch name validation.
//!
//! A branch name becomes a single directory under `history/local/`, so the
//! rules are about filesystem safety rather than git compatibility:
//! - Must be non-empty
//! - Must not contain `/` or `\`
//! - Must not contain control characters
//! - Must not consist only of dots

use crate::error::{RefError, Result};

/// Validate a branch name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use dep_refs::names::validate_branch_name;
///
/// assert!(validate_branch_name("main").is_ok());
/// assert!(validate_branch_name("feature-auth").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("feature/auth").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| RefError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("branch name must not be empty"));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(invalid("must not contain path separators"));
    }

    if let Some(ch) = name.chars().find(|c| c.is_control()) {
        return Err(invalid(&format!("contains control character {ch:?}")));
    }

    if name.chars().all(|c| c == '.') {
        return Err(invalid("must not consist only of dots"));
    }

    Ok(())
}
