//! Project directories and their session files.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{PulseError, Result};

use super::paths::{display_name_from_encoded, is_session_file, parse_session_filename};

/// A project directory under `projects/`.
#[derive(Debug, Clone)]
pub struct Project {
    /// Path to the project directory.
    path: PathBuf,
    /// Raw encoded directory name — the project's true key.
    encoded_name: String,
    /// Best-effort display name.
    display_name: String,
}

impl Project {
    /// Create a Project from its directory path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let encoded_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PulseError::ProjectNotFound {
                project: path.display().to_string(),
            })?
            .to_string();

        let display_name = display_name_from_encoded(&encoded_name);

        Ok(Self {
            path,
            encoded_name,
            display_name,
        })
    }

    /// Path to the project directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw encoded directory name.
    #[must_use]
    pub fn encoded_name(&self) -> &str {
        &self.encoded_name
    }

    /// The display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// List session files in this project, newest first.
    ///
    /// An unreadable project directory yields an empty list.
    #[must_use]
    pub fn sessions(&self) -> Vec<SessionFile> {
        let Ok(entries) = std::fs::read_dir(&self.path) else {
            return Vec::new();
        };

        let mut sessions: Vec<SessionFile> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| is_session_file(path))
            .filter_map(|path| SessionFile::from_path(&path))
            .collect();

        sessions.sort_by(|a, b| b.modified.cmp(&a.modified));
        sessions
    }

    /// Resolve a session id to a file path, trying `<id>.jsonl` first and
    /// falling back to the `agent-<id>.jsonl` naming variant.
    #[must_use]
    pub fn session_path(&self, session_id: &str) -> Option<PathBuf> {
        let primary = self.path.join(format!("{session_id}.jsonl"));
        if primary.is_file() {
            return Some(primary);
        }

        let agent_variant = self.path.join(format!("agent-{session_id}.jsonl"));
        if agent_variant.is_file() {
            return Some(agent_variant);
        }

        None
    }
}

/// One session file within a project.
#[derive(Debug, Clone)]
pub struct SessionFile {
    /// Path to the `.jsonl` file.
    pub path: PathBuf,
    /// Session identifier derived from the filename.
    pub session_id: String,
    /// Whether this is an agent-named variant.
    pub is_agent: bool,
    /// File modification time.
    pub modified: SystemTime,
}

impl SessionFile {
    fn from_path(path: &Path) -> Option<Self> {
        let info = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_session_filename)?;
        let modified = path
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        Some(Self {
            path: path.to_path_buf(),
            session_id: info.session_id,
            is_agent: info.is_agent,
            modified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID_A: &str = "40afc8a7-3fcb-4d29-b1ee-100b81b8c6c0";

    fn project_with_files(files: &[&str]) -> (tempfile::TempDir, Project) {
        let dir = tempfile::tempdir().unwrap();
        let proj_dir = dir.path().join("-home-u-demo");
        std::fs::create_dir_all(&proj_dir).unwrap();
        for f in files {
            std::fs::write(proj_dir.join(f), "{}\n").unwrap();
        }
        let project = Project::from_path(&proj_dir).unwrap();
        (dir, project)
    }

    #[test]
    fn test_project_names() {
        let (_dir, project) = project_with_files(&[]);
        assert_eq!(project.encoded_name(), "-home-u-demo");
        assert_eq!(project.display_name(), "demo");
    }

    #[test]
    fn test_sessions_filters_non_session_files() {
        let (_dir, project) = project_with_files(&[
            &format!("{UUID_A}.jsonl"),
            "agent-3e533ee.jsonl",
            "notes.txt",
        ]);

        let sessions = project.sessions();
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().any(|s| s.session_id == UUID_A));
        assert!(sessions.iter().any(|s| s.is_agent));
    }

    #[test]
    fn test_session_path_fallback_to_agent_variant() {
        let (_dir, project) = project_with_files(&["agent-3e533ee.jsonl"]);

        let path = project.session_path("3e533ee").unwrap();
        assert!(path.to_string_lossy().ends_with("agent-3e533ee.jsonl"));
        assert!(project.session_path("missing").is_none());
    }

    #[test]
    fn test_session_path_prefers_primary() {
        let (_dir, project) = project_with_files(&[&format!("{UUID_A}.jsonl")]);
        let path = project.session_path(UUID_A).unwrap();
        assert!(path.to_string_lossy().ends_with(&format!("{UUID_A}.jsonl")));
    }
}
