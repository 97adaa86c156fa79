//! Node name validation.
//!
//! Valid names:
//! - Must be non-empty
//! - Must be at most [`NAME_MAX`] bytes
//! - Must not contain `/` or NUL
//! - Must not be `.` or `..`

use cfs_types::NAME_MAX;

use crate::error::{TreeError, TreeResult};

/// Validate a single node name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use cfs_tree::names::validate_name;
///
/// assert!(validate_name("contador1").is_ok());
/// assert!(validate_name("").is_err());
/// assert!(validate_name("a/b").is_err());
/// ```
pub fn validate_name(name: &str) -> TreeResult<()> {
    let reject = |reason: &str| {
        Err(TreeError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return reject("name must not be empty");
    }
    if name.len() > NAME_MAX {
        return reject(&format!("name longer than {NAME_MAX} bytes"));
    }
    if name.contains('/') {
        return reject("name must not contain '/'");
    }
    if name.contains('\0') {
        return reject("name must not contain NUL");
    }
    if name == "." || name == ".." {
        return reject("'.' and '..' are reserved");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(validate_name("contador1").is_ok());
        assert!(validate_name("carpeta 1").is_ok());
        assert!(validate_name(".hidden").is_ok());
        assert!(validate_name("...").is_ok());
        assert!(validate_name(&"n".repeat(NAME_MAX)).is_ok());
    }

    #[test]
    fn empty_name() {
        assert!(validate_name("").is_err());
    }

    #[test]
    fn too_long() {
        assert!(validate_name(&"n".repeat(NAME_MAX + 1)).is_err());
    }

    #[test]
    fn slash_and_nul() {
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("/").is_err());
        assert!(validate_name("a\0b").is_err());
    }

    #[test]
    fn dot_entries_reserved() {
        assert!(validate_name(".").is_err());
        assert!(validate_name("..").is_err());
    }

    #[test]
    fn error_carries_name_and_reason() {
        match validate_name("x/y").unwrap_err() {
            TreeError::InvalidName { name, reason } => {
                assert_eq!(name, "x/y");
                assert!(reason.contains('/'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
