//! Path utilities: home discovery, session filenames, display names.
//!
//! Project directories encode a working-directory path with separators
//! replaced by `-`. The encoding is lossy (a hyphen in the original path is
//! indistinguishable from a separator), so the decoded form is a best-effort
//! display transform only — the raw directory name stays the key everywhere.

use std::path::{Path, PathBuf};

/// Get the user's home directory.
#[must_use]
pub fn home_directory() -> Option<PathBuf> {
    directories::UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Path segments dropped from the front of a decoded project name.
const FILTERED_SEGMENTS: [&str; 4] = ["home", "Users", "root", "mnt"];

/// Derive a display name from an encoded project directory name.
///
/// Strips the leading separator run, drops leading well-known path segments
/// ("home", "Users", ..., single-letter drive identifiers) plus the username
/// segment following a home prefix, and rejoins whatever remains. Ambiguity
/// is inherent; this is presentation only.
#[must_use]
pub fn display_name_from_encoded(encoded: &str) -> String {
    let mut segments: Vec<&str> = encoded
        .trim_start_matches('-')
        .split('-')
        .filter(|s| !s.is_empty())
        .collect();

    // Drop drive-letter-like and well-known prefixes
    let mut saw_home_prefix = false;
    while let Some(first) = segments.first() {
        let is_drive = first.len() == 1 && first.chars().all(|c| c.is_ascii_alphabetic());
        if is_drive || FILTERED_SEGMENTS.contains(first) {
            saw_home_prefix = FILTERED_SEGMENTS.contains(first);
            segments.remove(0);
        } else {
            break;
        }
    }

    // The segment after a home prefix is the username; keep it only if it is
    // all that remains
    if saw_home_prefix && segments.len() > 1 {
        segments.remove(0);
    }

    if segments.is_empty() {
        encoded.to_string()
    } else {
        segments.join("-")
    }
}

/// Information extracted from a session filename.
#[derive(Debug, Clone)]
pub struct SessionFileInfo {
    /// Session identifier (uuid or `agent-<hash>`).
    pub session_id: String,
    /// Whether this is an agent-named variant.
    pub is_agent: bool,
}

/// Parse a session filename (`<uuid>.jsonl` or `agent-<hash>.jsonl`).
#[must_use]
pub fn parse_session_filename(filename: &str) -> Option<SessionFileInfo> {
    let name = filename.strip_suffix(".jsonl")?;

    if name.strip_prefix("agent-").is_some() {
        Some(SessionFileInfo {
            session_id: name.to_string(),
            is_agent: true,
        })
    } else if name.len() >= 32 && name.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        Some(SessionFileInfo {
            session_id: name.to_string(),
            is_agent: false,
        })
    } else {
        None
    }
}

/// Check if a path looks like a session file.
#[must_use]
pub fn is_session_file(path: &Path) -> bool {
    path.extension().map(|ext| ext == "jsonl").unwrap_or(false)
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| parse_session_filename(n).is_some())
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_home_prefix() {
        assert_eq!(display_name_from_encoded("-home-user-my-project"), "my-project");
        assert_eq!(display_name_from_encoded("-Users-someone-dev"), "dev");
    }

    #[test]
    fn test_display_name_strips_drive_prefix() {
        assert_eq!(display_name_from_encoded("-mnt-c-dev-tool"), "dev-tool");
    }

    #[test]
    fn test_display_name_keeps_sole_segment() {
        assert_eq!(display_name_from_encoded("-home-user"), "user");
    }

    #[test]
    fn test_display_name_falls_back_to_raw() {
        assert_eq!(display_name_from_encoded("---"), "---");
    }

    #[test]
    fn test_parse_session_filename() {
        let info = parse_session_filename("40afc8a7-3fcb-4d29-b1ee-100b81b8c6c0.jsonl").unwrap();
        assert_eq!(info.session_id, "40afc8a7-3fcb-4d29-b1ee-100b81b8c6c0");
        assert!(!info.is_agent);

        let info = parse_session_filename("agent-3e533ee.jsonl").unwrap();
        assert!(info.is_agent);
        assert_eq!(info.session_id, "agent-3e533ee");

        assert!(parse_session_filename("notes.txt").is_none());
        assert!(parse_session_filename("short.jsonl").is_none());
    }

    #[test]
    fn test_is_session_file() {
        assert!(is_session_file(Path::new(
            "/x/40afc8a7-3fcb-4d29-b1ee-100b81b8c6c0.jsonl"
        )));
        assert!(is_session_file(Path::new("/x/agent-abc123.jsonl")));
        assert!(!is_session_file(Path::new("/x/readme.md")));
    }
}
