//! Aggregation of session records into dashboard statistics.
//!
//! The aggregator is pure: records go in, an accumulated summary comes out.
//! No process-wide state. Per-session stats are computed first, then folded
//! into the global scan summary and the owning project's totals, so that
//! session-scoped rules (first-seen branch, per-model session counting)
//! stay local.

pub mod insights;
pub mod rank;

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, instrument};

use crate::discovery::DataDirectory;
use crate::error::Result;
use crate::model::{ModelTokenTotals, SessionRecord};
use crate::parser::JsonlParser;

/// Retention window for time-bucketed statistics, in days.
pub const RETENTION_DAYS: i64 = 180;

/// Classify a model identifier into a short display name.
///
/// Substring match on the model family; anything unrecognized passes
/// through unchanged.
#[must_use]
pub fn classify_model(model: &str) -> String {
    let lower = model.to_ascii_lowercase();
    if lower.contains("opus") {
        "Opus".to_string()
    } else if lower.contains("sonnet") {
        "Sonnet".to_string()
    } else if lower.contains("haiku") {
        "Haiku".to_string()
    } else {
        model.to_string()
    }
}

/// Walks session records and folds them into summaries.
#[derive(Debug, Clone)]
pub struct Aggregator {
    now: DateTime<Utc>,
    retention: Duration,
}

impl Aggregator {
    /// Create an aggregator anchored at the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_now(Utc::now())
    }

    /// Create an aggregator anchored at a fixed time (deterministic tests).
    #[must_use]
    pub fn with_now(now: DateTime<Utc>) -> Self {
        Self {
            now,
            retention: Duration::days(RETENTION_DAYS),
        }
    }

    /// The anchor time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Oldest timestamp that still lands in the time buckets.
    #[must_use]
    pub fn retention_cutoff(&self) -> DateTime<Utc> {
        self.now - self.retention
    }

    /// Walk one session's records in file order and accumulate its stats.
    #[must_use]
    pub fn walk_session(&self, records: &[SessionRecord]) -> SessionStats {
        let cutoff = self.retention_cutoff();
        let mut stats = SessionStats::default();

        for record in records {
            if let Some(ts) = record.timestamp {
                if ts >= cutoff {
                    let date_key = ts.format("%Y-%m-%d").to_string();
                    *stats.daily.entry(date_key).or_insert(0) += 1;
                    stats.hourly[ts.hour() as usize] += 1;
                    stats.weekday[ts.weekday().num_days_from_sunday() as usize] += 1;

                    if stats.started_at.map_or(true, |start| ts < start) {
                        stats.started_at = Some(ts);
                    }
                    if stats.ended_at.map_or(true, |end| ts > end) {
                        stats.ended_at = Some(ts);
                    }
                }
            }

            if record.is_message() {
                stats.message_count += 1;
            }

            // First branch seen wins for the whole session
            if stats.first_branch.is_none() {
                if let Some(branch) = &record.git_branch {
                    stats.first_branch = Some(branch.clone());
                }
            }

            if record.is_assistant() {
                for name in record.tool_use_names() {
                    stats.tool_calls += 1;
                    *stats.tool_counts.entry(name.to_string()).or_insert(0) += 1;
                }
            }

            if let Some(model) = record.model() {
                let display = classify_model(model);
                stats.models.insert(display.clone());

                if let Some(usage) = record.message.as_ref().and_then(|m| m.usage.as_ref()) {
                    let totals = stats.model_tokens.entry(display).or_default();
                    totals.merge(&ModelTokenTotals {
                        input_tokens: usage.input_tokens,
                        output_tokens: usage.output_tokens,
                        cache_creation_input_tokens: usage.cache_creation_input_tokens,
                        cache_read_input_tokens: usage.cache_read_input_tokens,
                    });
                }
            }
        }

        stats
    }

    /// Scan the whole data directory: every session of every project.
    ///
    /// Unreadable files and malformed lines degrade to "no data"; the scan
    /// itself only fails on programming errors, not on input.
    #[instrument(skip(self, data), fields(root = %data.root().display()))]
    pub fn scan(&self, data: &DataDirectory) -> Result<ScanSummary> {
        let mut summary = ScanSummary::default();
        let mut parser = JsonlParser::new();

        for project in data.projects() {
            let mut totals = ProjectSummary::new(project.encoded_name(), project.display_name());

            for session in project.sessions() {
                let records: Vec<SessionRecord> = parser.parse_file(&session.path)?;
                let stats = self.walk_session(&records);
                summary.fold_session(&mut totals, &stats);
            }

            summary.projects.push(totals);
        }

        debug!(
            projects = summary.projects.len(),
            sessions = summary.session_count,
            messages = summary.message_count,
            "Scan complete"
        );
        Ok(summary)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulated stats for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    /// Records with type `user` or `assistant`.
    pub message_count: u64,
    /// Total `tool_use` blocks in assistant records.
    pub tool_calls: u64,
    /// Tool calls by tool name, insertion-ordered.
    pub tool_counts: IndexMap<String, u64>,
    /// First branch seen in the session, if any.
    pub first_branch: Option<String>,
    /// Display names of models used.
    pub models: IndexSet<String>,
    /// Token totals by model display name.
    pub model_tokens: IndexMap<String, ModelTokenTotals>,
    /// Earliest in-window timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Latest in-window timestamp.
    pub ended_at: Option<DateTime<Utc>>,
    /// In-window records per hour of day.
    pub hourly: [u64; 24],
    /// In-window records per day of week (Sunday first).
    pub weekday: [u64; 7],
    /// In-window records per date ("YYYY-MM-DD").
    pub daily: BTreeMap<String, u64>,
}

/// Accumulated stats for the whole scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Session files scanned.
    pub session_count: u64,
    /// Messages across all sessions.
    pub message_count: u64,
    /// Tool calls across all sessions.
    pub tool_call_count: u64,
    /// Tool calls by tool name.
    pub tool_counts: IndexMap<String, u64>,
    /// Sessions per first-seen branch.
    pub branch_counts: IndexMap<String, u64>,
    /// Sessions per model display name.
    pub model_session_counts: IndexMap<String, u64>,
    /// Token totals by model display name.
    pub model_tokens: IndexMap<String, ModelTokenTotals>,
    /// In-window records per hour of day.
    pub hourly: [u64; 24],
    /// In-window records per day of week (Sunday first).
    pub weekday: [u64; 7],
    /// In-window records per date.
    pub daily: BTreeMap<String, u64>,
    /// Latest activity across all sessions.
    pub last_activity: Option<DateTime<Utc>>,
    /// Per-project totals, in scan order.
    pub projects: Vec<ProjectSummary>,
}

impl ScanSummary {
    /// Fold one session's stats into the global summary and its project.
    pub fn fold_session(&mut self, project: &mut ProjectSummary, stats: &SessionStats) {
        self.session_count += 1;
        self.message_count += stats.message_count;
        self.tool_call_count += stats.tool_calls;

        for (tool, count) in &stats.tool_counts {
            *self.tool_counts.entry(tool.clone()).or_insert(0) += count;
        }

        if let Some(branch) = &stats.first_branch {
            *self.branch_counts.entry(branch.clone()).or_insert(0) += 1;
            if !project.branches.contains(branch) {
                project.branches.push(branch.clone());
            }
        }

        for model in &stats.models {
            *self.model_session_counts.entry(model.clone()).or_insert(0) += 1;
        }

        for (model, tokens) in &stats.model_tokens {
            self.model_tokens.entry(model.clone()).or_default().merge(tokens);
        }

        for (hour, count) in stats.hourly.iter().enumerate() {
            self.hourly[hour] += count;
        }
        for (day, count) in stats.weekday.iter().enumerate() {
            self.weekday[day] += count;
        }
        for (date, count) in &stats.daily {
            *self.daily.entry(date.clone()).or_insert(0) += count;
        }

        if let Some(end) = stats.ended_at {
            if self.last_activity.map_or(true, |last| end > last) {
                self.last_activity = Some(end);
            }
        }

        project.session_count += 1;
        project.message_count += stats.message_count;
        project.tool_call_count += stats.tool_calls;
        if let Some(end) = stats.ended_at {
            if project.last_activity.map_or(true, |last| end > last) {
                project.last_activity = Some(end);
            }
        }
    }

    /// Total tokens across all models.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.model_tokens.values().map(ModelTokenTotals::total).sum()
    }

    /// Number of distinct active dates.
    #[must_use]
    pub fn active_days(&self) -> usize {
        self.daily.len()
    }
}

/// Accumulated totals for one project.
#[derive(Debug, Clone, Default)]
pub struct ProjectSummary {
    /// Raw encoded directory name — the project key.
    pub encoded_name: String,
    /// Best-effort display name.
    pub display_name: String,
    /// Sessions in the project.
    pub session_count: u64,
    /// Messages across the project's sessions.
    pub message_count: u64,
    /// Tool calls across the project's sessions.
    pub tool_call_count: u64,
    /// Distinct first-seen branches, in order of appearance.
    pub branches: Vec<String>,
    /// Max session end time.
    pub last_activity: Option<DateTime<Utc>>,
}

impl ProjectSummary {
    /// Create an empty summary for a project.
    #[must_use]
    pub fn new(encoded_name: &str, display_name: &str) -> Self {
        Self {
            encoded_name: encoded_name.to_string(),
            display_name: display_name.to_string(),
            ..Default::default()
        }
    }
}
