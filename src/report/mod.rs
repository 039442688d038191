//! Batch artifact shaping and writing.
//!
//! `build_report` reshapes a scan summary (plus the optional trusted cache
//! snapshot) into the fixed dashboard schema; `write_report` emits it
//! atomically as pretty-printed JSON.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::analytics::rank::{top_n, TOP_BRANCHES, TOP_PROJECTS, TOP_TOOLS};
use crate::analytics::{insights, ProjectSummary, ScanSummary};
use crate::error::Result;
use crate::model::{ModelTokenTotals, UsageCache};
use crate::pricing::estimate_cost;
use crate::util::atomic_write;

/// The batch-mode dashboard artifact. Top-level keys are fixed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// First and last known activity dates.
    pub date_range: DateRange,
    /// Headline totals.
    pub summary: ReportSummary,
    /// Per-model usage and cost.
    pub model_usage: Vec<ModelUsageEntry>,
    /// Top tools by call count.
    pub tool_usage: Vec<CountEntry>,
    /// Per-day activity, date-ordered.
    pub daily_activity: Vec<DayEntry>,
    /// Records per hour of day; 24 elements.
    pub hourly_activity: Vec<u64>,
    /// Records per day of week, Sunday first; 7 elements.
    pub weekday_activity: Vec<u64>,
    /// Top projects by session count.
    pub projects: Vec<ProjectEntry>,
    /// Top branches by session count.
    pub git_branches: Vec<CountEntry>,
    /// Per-day token totals from the cache snapshot.
    pub token_trends: Vec<TokenTrendPoint>,
    /// Ordered one-line observations.
    pub insights: Vec<String>,
}

/// First and last activity dates ("YYYY-MM-DD").
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// Earliest known date.
    pub from: Option<String>,
    /// Latest known date.
    pub to: Option<String>,
}

/// Headline totals for the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Total sessions.
    pub total_sessions: u64,
    /// Total messages.
    pub total_messages: u64,
    /// Total tool calls.
    pub total_tool_calls: u64,
    /// Distinct active dates in the scan window.
    pub active_days: usize,
    /// Estimated total cost in USD, rounded to cents.
    pub estimated_cost: f64,
    /// Most recent activity.
    pub last_activity: Option<DateTime<Utc>>,
}

/// Per-model usage entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUsageEntry {
    /// Model display name.
    pub model: String,
    /// Sessions that used the model.
    pub sessions: u64,
    /// Token totals.
    pub tokens: ModelTokenTotals,
    /// Estimated cost in USD, rounded to cents.
    pub cost: f64,
}

/// A name with a count, for ranked lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountEntry {
    /// Tool or branch name.
    pub name: String,
    /// Occurrence count.
    pub count: u64,
}

/// One day of merged activity.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntry {
    /// Date ("YYYY-MM-DD").
    pub date: String,
    /// Messages that day (max of cache and fresh scan).
    pub messages: u64,
    /// Sessions that day (cache only).
    pub sessions: u64,
    /// Tokens that day (cache only).
    pub tokens: u64,
}

/// Per-project entry in the public artifact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    /// Raw encoded directory name — the project key.
    pub name: String,
    /// Best-effort display name.
    pub display_name: String,
    /// Session count.
    pub sessions: u64,
    /// Message count.
    pub messages: u64,
    /// Tool-call count.
    pub tool_calls: u64,
    /// Branches seen, in order of appearance.
    pub branches: Vec<String>,
    /// Most recent activity.
    pub last_activity: Option<DateTime<Utc>>,
}

/// Token totals for one day, summed across models.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTrendPoint {
    /// Date ("YYYY-MM-DD").
    pub date: String,
    /// Fresh input tokens.
    pub input_tokens: u64,
    /// Output tokens.
    pub output_tokens: u64,
    /// Cache-write tokens.
    pub cache_creation_input_tokens: u64,
    /// Cache-read tokens.
    pub cache_read_input_tokens: u64,
}

/// Round to two decimals for display.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Merge scan and cache model tokens: the cache is the trusted lifetime
/// aggregate and wins where both know a model; the scan supplies models the
/// cache has not seen yet.
#[must_use]
pub fn merged_model_tokens(
    scan: &ScanSummary,
    cache: Option<&UsageCache>,
) -> Vec<(String, ModelTokenTotals)> {
    let mut merged: Vec<(String, ModelTokenTotals)> = Vec::new();

    if let Some(cache) = cache {
        for (model, tokens) in &cache.model_usage {
            merged.push((model.clone(), tokens.clone()));
        }
    }

    for (model, tokens) in &scan.model_tokens {
        if !merged.iter().any(|(name, _)| name == model) {
            merged.push((model.clone(), tokens.clone()));
        }
    }

    merged
}

/// Build the dashboard artifact from a scan summary and the optional cache.
#[must_use]
pub fn build_report(
    scan: &ScanSummary,
    cache: Option<&UsageCache>,
    generated_at: DateTime<Utc>,
) -> DashboardReport {
    let model_tokens = merged_model_tokens(scan, cache);

    let estimated_cost: f64 = model_tokens
        .iter()
        .map(|(model, tokens)| estimate_cost(model, tokens).total_cost)
        .sum();

    let model_usage = model_tokens
        .into_iter()
        .map(|(model, tokens)| {
            let cost = estimate_cost(&model, &tokens).total_display();
            let sessions = scan.model_session_counts.get(&model).copied().unwrap_or(0);
            ModelUsageEntry {
                model,
                sessions,
                tokens,
                cost,
            }
        })
        .collect();

    let mut projects: Vec<&ProjectSummary> = scan.projects.iter().collect();
    projects.sort_by(|a, b| b.session_count.cmp(&a.session_count));
    projects.truncate(TOP_PROJECTS);
    let projects = projects
        .into_iter()
        .map(|p| ProjectEntry {
            name: p.encoded_name.clone(),
            display_name: p.display_name.clone(),
            sessions: p.session_count,
            messages: p.message_count,
            tool_calls: p.tool_call_count,
            branches: p.branches.clone(),
            last_activity: p.last_activity,
        })
        .collect();

    DashboardReport {
        generated_at,
        date_range: date_range(scan, cache),
        summary: ReportSummary {
            total_sessions: cache.map_or(0, |c| c.total_sessions).max(scan.session_count),
            total_messages: cache.map_or(0, |c| c.total_messages).max(scan.message_count),
            total_tool_calls: scan.tool_call_count,
            active_days: scan.active_days(),
            estimated_cost: round_cents(estimated_cost),
            last_activity: scan.last_activity,
        },
        model_usage,
        tool_usage: to_count_entries(top_n(&scan.tool_counts, TOP_TOOLS)),
        daily_activity: merged_daily(scan, cache),
        hourly_activity: scan.hourly.to_vec(),
        weekday_activity: scan.weekday.to_vec(),
        projects,
        git_branches: to_count_entries(top_n(&scan.branch_counts, TOP_BRANCHES)),
        token_trends: token_trends(cache),
        insights: insights::generate(scan),
    }
}

/// Write the artifact as pretty-printed JSON, atomically.
pub fn write_report(path: impl AsRef<Path>, report: &DashboardReport) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(report)?;
    atomic_write(path, &json)?;
    info!(path = %path.display(), bytes = json.len(), "Report written");
    Ok(())
}

fn to_count_entries(ranked: Vec<(String, u64)>) -> Vec<CountEntry> {
    ranked
        .into_iter()
        .map(|(name, count)| CountEntry { name, count })
        .collect()
}

fn date_range(scan: &ScanSummary, cache: Option<&UsageCache>) -> DateRange {
    let from = cache
        .and_then(|c| c.first_session_date.clone())
        .or_else(|| scan.daily.keys().next().cloned());
    let to = scan
        .last_activity
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .or_else(|| scan.daily.keys().next_back().cloned());
    DateRange { from, to }
}

/// Union of cache and scan daily activity, date-ordered.
fn merged_daily(scan: &ScanSummary, cache: Option<&UsageCache>) -> Vec<DayEntry> {
    let mut days: BTreeMap<String, DayEntry> = BTreeMap::new();

    if let Some(cache) = cache {
        for (date, activity) in &cache.daily_activity {
            days.insert(
                date.clone(),
                DayEntry {
                    date: date.clone(),
                    messages: activity.messages,
                    sessions: activity.sessions,
                    tokens: activity.tokens,
                },
            );
        }
    }

    for (date, count) in &scan.daily {
        let entry = days.entry(date.clone()).or_insert_with(|| DayEntry {
            date: date.clone(),
            ..Default::default()
        });
        entry.messages = entry.messages.max(*count);
    }

    days.into_values().collect()
}

/// Per-day token totals summed across models, from the cache snapshot.
fn token_trends(cache: Option<&UsageCache>) -> Vec<TokenTrendPoint> {
    let Some(cache) = cache else {
        return Vec::new();
    };

    let mut points: BTreeMap<String, TokenTrendPoint> = BTreeMap::new();
    for (date, models) in &cache.daily_model_tokens {
        let point = points.entry(date.clone()).or_insert_with(|| TokenTrendPoint {
            date: date.clone(),
            ..Default::default()
        });
        for tokens in models.values() {
            point.input_tokens += tokens.input_tokens;
            point.output_tokens += tokens.output_tokens;
            point.cache_creation_input_tokens += tokens.cache_creation_input_tokens;
            point.cache_read_input_tokens += tokens.cache_read_input_tokens;
        }
    }

    points.into_values().collect()
}
