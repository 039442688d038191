//! Data directory and project discovery.
//!
//! All input data lives under one externally-owned directory tree
//! (`~/.claude` by default):
//!
//! - `projects/<encoded-path>/<session>.jsonl` — session transcripts
//! - `usage-cache.json` — trusted precomputed aggregate snapshot
//! - `history.jsonl` — optional flat prompt history

mod paths;
mod project;

pub use paths::*;
pub use project::*;

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{PulseError, Result};
use crate::model::UsageCache;
use crate::{DATA_DIR_NAME, HISTORY_FILE_NAME, PROJECTS_DIR_NAME, USAGE_CACHE_FILE_NAME};

/// The Claude Code data directory and the fixed paths inside it.
#[derive(Debug, Clone)]
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    /// Discover the data directory.
    ///
    /// Checks locations in order:
    /// 1. Environment variable `CLAUDE_PULSE_DATA_DIR`
    /// 2. Home directory (`~/.claude/`)
    pub fn discover() -> Result<Self> {
        if let Ok(env_path) = std::env::var("CLAUDE_PULSE_DATA_DIR") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                return Ok(Self { root: path });
            }
        }

        let home = home_directory().ok_or_else(|| PulseError::DataDirectoryNotFound {
            expected_path: PathBuf::from("~/.claude"),
        })?;

        let home_path = home.join(DATA_DIR_NAME);
        if home_path.exists() {
            return Ok(Self { root: home_path });
        }

        Err(PulseError::DataDirectoryNotFound {
            expected_path: home_path,
        })
    }

    /// Use a specific directory as the data root.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(PulseError::DataDirectoryNotFound {
                expected_path: root,
            });
        }
        Ok(Self { root })
    }

    /// The data root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the projects directory.
    #[must_use]
    pub fn projects_dir(&self) -> PathBuf {
        self.root.join(PROJECTS_DIR_NAME)
    }

    /// Path to the usage cache file.
    #[must_use]
    pub fn usage_cache_path(&self) -> PathBuf {
        self.root.join(USAGE_CACHE_FILE_NAME)
    }

    /// Path to the prompt history file.
    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.root.join(HISTORY_FILE_NAME)
    }

    /// List all project directories, in directory-walk order.
    ///
    /// A missing projects directory is "no data", not an error.
    #[must_use]
    pub fn projects(&self) -> Vec<Project> {
        let projects_dir = self.projects_dir();
        if !projects_dir.is_dir() {
            debug!(path = %projects_dir.display(), "No projects directory");
            return Vec::new();
        }

        WalkDir::new(&projects_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_dir())
            .filter_map(|entry| Project::from_path(entry.path()).ok())
            .collect()
    }

    /// Look up a project by its encoded directory name.
    pub fn find_project(&self, encoded_name: &str) -> Result<Project> {
        let path = self.projects_dir().join(encoded_name);
        if !path.is_dir() {
            return Err(PulseError::ProjectNotFound {
                project: encoded_name.to_string(),
            });
        }
        Project::from_path(&path)
    }

    /// Load the usage cache snapshot.
    ///
    /// A missing cache is `Ok(None)`; a malformed cache is an error so the
    /// caller can degrade to scan-only data with a warning.
    pub fn load_usage_cache(&self) -> Result<Option<UsageCache>> {
        let path = self.usage_cache_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PulseError::io(
                    format!("Failed to read usage cache: {}", path.display()),
                    e,
                ))
            }
        };

        let cache = serde_json::from_str(&content).map_err(|e| PulseError::SerializationError {
            context: format!("Failed to parse usage cache: {}", path.display()),
            source: e,
        })?;
        Ok(Some(cache))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projects_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDirectory::from_path(dir.path()).unwrap();
        assert!(data.projects().is_empty());
    }

    #[test]
    fn test_projects_lists_directories_only() {
        let dir = tempfile::tempdir().unwrap();
        let projects = dir.path().join(PROJECTS_DIR_NAME);
        std::fs::create_dir_all(projects.join("-home-u-alpha")).unwrap();
        std::fs::create_dir_all(projects.join("-home-u-beta")).unwrap();
        std::fs::write(projects.join("stray.txt"), "x").unwrap();

        let data = DataDirectory::from_path(dir.path()).unwrap();
        assert_eq!(data.projects().len(), 2);
    }

    #[test]
    fn test_find_project_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDirectory::from_path(dir.path()).unwrap();
        assert!(matches!(
            data.find_project("-missing"),
            Err(PulseError::ProjectNotFound { .. })
        ));
    }

    #[test]
    fn test_load_usage_cache_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDirectory::from_path(dir.path()).unwrap();
        assert!(data.load_usage_cache().unwrap().is_none());
    }

    #[test]
    fn test_load_usage_cache_malformed_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(USAGE_CACHE_FILE_NAME), "{not json").unwrap();

        let data = DataDirectory::from_path(dir.path()).unwrap();
        assert!(data.load_usage_cache().is_err());
    }

    #[test]
    fn test_load_usage_cache_well_formed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(USAGE_CACHE_FILE_NAME),
            r#"{"totalSessions": 7}"#,
        )
        .unwrap();

        let data = DataDirectory::from_path(dir.path()).unwrap();
        let cache = data.load_usage_cache().unwrap().unwrap();
        assert_eq!(cache.total_sessions, 7);
    }
}
