//! claude-pulse: personal dashboard for Claude Code session logs.
//!
//! This crate aggregates locally stored session transcripts
//! (`~/.claude/projects/*/<session>.jsonl`), a precomputed usage cache, and
//! an optional prompt history file into summary statistics, emitted either
//! as a single JSON artifact (batch mode) or over a read-only HTTP API with
//! an embedded frontend (server mode).
//!
//! Data flows one way: disk → parse → aggregate → shape → emit. Everything
//! is recomputed from scratch on every invocation; nothing persists across
//! runs except the externally-owned log files and cache.
//!
//! # Example
//!
//! ```rust,no_run
//! use claude_pulse::analytics::Aggregator;
//! use claude_pulse::discovery::DataDirectory;
//!
//! fn main() -> claude_pulse::Result<()> {
//!     let data = DataDirectory::discover()?;
//!     let summary = Aggregator::new().scan(&data)?;
//!     println!("{} sessions, {} messages", summary.session_count, summary.message_count);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`model`]: loose record types for session lines, history entries, and
//!   the trusted cache snapshot
//! - [`parser`]: lenient line-delimited JSON parsing
//! - [`discovery`]: data directory, project, and session file discovery
//! - [`analytics`]: the pure aggregator plus ranking and insights
//! - [`pricing`]: static price table and cost estimation
//! - [`report`]: batch artifact shaping and atomic writing
//! - [`server`]: axum HTTP surface and embedded frontend
//! - [`cli`]: command-line interface
//! - [`error`]: error types and handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod analytics;
pub mod cli;
pub mod discovery;
pub mod error;
pub mod model;
pub mod parser;
pub mod pricing;
pub mod report;
pub mod server;
pub mod util;

// Re-export commonly used types at the crate root
pub use error::{PulseError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Default Claude Code data directory name.
pub const DATA_DIR_NAME: &str = ".claude";

/// Projects subdirectory name.
pub const PROJECTS_DIR_NAME: &str = "projects";

/// Usage cache filename.
pub const USAGE_CACHE_FILE_NAME: &str = "usage-cache.json";

/// Prompt history filename.
pub const HISTORY_FILE_NAME: &str = "history.jsonl";
