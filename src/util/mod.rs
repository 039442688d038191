//! Utility functions for common operations.
//!
//! Shared helpers used across the crate:
//! - Atomic file writes for the batch artifact
//! - Preview truncation for parse-error logging

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{PulseError, Result};

/// Atomically write content to a file.
///
/// Writes to a temporary file in the target directory, then renames it into
/// place. If any step fails, the original file (if it exists) remains
/// unchanged.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    // Temp file must live in the same directory for the rename to be atomic
    let parent = path.parent().ok_or_else(|| PulseError::IoError {
        context: format!("Cannot determine parent directory for: {}", path.display()),
        source: io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
    })?;

    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            PulseError::io(format!("Failed to create directory: {}", parent.display()), e)
        })?;
    }

    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        PulseError::io(
            format!("Failed to create temporary file in: {}", parent.display()),
            e,
        )
    })?;

    temp_file.write_all(content).map_err(|e| {
        PulseError::io(
            format!("Failed to write to temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.flush().map_err(|e| {
        PulseError::io(
            format!("Failed to flush temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        PulseError::io(format!("Failed to persist file: {}", path.display()), e.error)
    })?;

    Ok(())
}

/// Truncate a string for preview display.
///
/// Uses character-aware truncation to avoid panicking on multi-byte UTF-8
/// characters.
#[must_use]
pub fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        atomic_write(&path, b"{\"ok\":true}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"ok\":true}");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        std::fs::write(&path, "old").unwrap();
        atomic_write(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("out.json");

        atomic_write(&path, b"data").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_truncate_preview_short() {
        assert_eq!(truncate_preview("short", 100), "short");
    }

    #[test]
    fn test_truncate_preview_long() {
        let truncated = truncate_preview(&"x".repeat(200), 100);
        assert_eq!(truncated.len(), 103);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_preview_multibyte() {
        // Must not panic on a char boundary inside a multi-byte sequence
        let s = "héllo wörld".repeat(20);
        let _ = truncate_preview(&s, 7);
    }
}
