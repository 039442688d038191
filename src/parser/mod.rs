//! Line-delimited JSON parsing for session and history logs.
//!
//! Files are read fully into memory and split on newlines; each non-blank
//! line is parsed as an independent JSON value. There is no partial-line
//! buffering and no streaming — session files are personal-scale.
//!
//! # Parsing Modes
//!
//! - **Lenient mode** (default): malformed lines are skipped and counted,
//!   unreadable files yield an empty result. The aggregation pipeline only
//!   ever uses this mode.
//! - **Strict mode**: fails on the first unreadable file or malformed line.
//!
//! # Example
//!
//! ```rust,no_run
//! use claude_pulse::model::SessionRecord;
//! use claude_pulse::parser::JsonlParser;
//!
//! let mut parser = JsonlParser::new();
//! let records: Vec<SessionRecord> = parser.parse_file("session.jsonl")?;
//! println!("Parsed {} of {} lines", records.len(), parser.stats().lines_processed);
//! # Ok::<(), claude_pulse::PulseError>(())
//! ```

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::error::{PulseError, Result};
use crate::util::truncate_preview;

/// Line-delimited JSON parser with graceful error recovery.
#[derive(Debug)]
pub struct JsonlParser {
    /// Whether to skip malformed lines instead of failing.
    lenient: bool,
    /// Statistics about the most recent parse.
    stats: ParseStats,
}

/// Statistics about a parsing operation.
#[derive(Debug, Clone, Default)]
pub struct ParseStats {
    /// Total lines seen.
    pub lines_processed: usize,
    /// Successfully parsed records.
    pub records_parsed: usize,
    /// Malformed, skipped lines.
    pub lines_skipped: usize,
    /// Blank lines.
    pub empty_lines: usize,
    /// Errors encountered (lenient mode collects, strict mode returns).
    pub errors: Vec<ParseError>,
}

/// A parsing error with context.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// 1-indexed line number.
    pub line: usize,
    /// Error message.
    pub message: String,
    /// Truncated original line content.
    pub content_preview: String,
}

impl JsonlParser {
    /// Create a new lenient parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lenient: true,
            stats: ParseStats::default(),
        }
    }

    /// Set lenient mode (skip malformed lines instead of failing).
    #[must_use]
    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Get statistics for the most recent parse.
    #[must_use]
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Parse a line-delimited file into records of type `T`.
    ///
    /// In lenient mode an unreadable file yields an empty vector; callers
    /// treat missing data as "no data", never as a failure.
    pub fn parse_file<T: DeserializeOwned>(&mut self, path: impl AsRef<Path>) -> Result<Vec<T>> {
        let path = path.as_ref();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                if self.lenient {
                    warn!(path = %path.display(), error = %e, "Unreadable file, treating as empty");
                    self.stats = ParseStats::default();
                    return Ok(Vec::new());
                }
                return Err(if e.kind() == std::io::ErrorKind::NotFound {
                    PulseError::FileNotFound {
                        path: path.to_path_buf(),
                    }
                } else {
                    PulseError::io(format!("Failed to read {}", path.display()), e)
                });
            }
        };

        self.parse_str(&content)
    }

    /// Parse line-delimited content from a string.
    pub fn parse_str<T: DeserializeOwned>(&mut self, content: &str) -> Result<Vec<T>> {
        let mut records = Vec::new();
        self.stats = ParseStats::default();

        for (line_num, line) in content.lines().enumerate() {
            let line_num = line_num + 1; // 1-indexed
            self.stats.lines_processed += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                self.stats.empty_lines += 1;
                continue;
            }

            match serde_json::from_str::<T>(trimmed) {
                Ok(record) => {
                    self.stats.records_parsed += 1;
                    records.push(record);
                }
                Err(e) => {
                    if self.lenient {
                        self.stats.lines_skipped += 1;
                        self.stats.errors.push(ParseError {
                            line: line_num,
                            message: e.to_string(),
                            content_preview: truncate_preview(trimmed, 100),
                        });
                        trace!(line = line_num, error = %e, "Parse error, skipping line");
                        continue;
                    }
                    return Err(PulseError::parse_with_source(line_num, e.to_string(), e));
                }
            }
        }

        debug!(
            records = records.len(),
            lines = self.stats.lines_processed,
            skipped = self.stats.lines_skipped,
            "Parsing complete"
        );
        Ok(records)
    }
}

impl Default for JsonlParser {
    fn default() -> Self {
        Self::new()
    }
}
