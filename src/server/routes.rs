//! API route handlers.
//!
//! Each handler performs a fresh, independent filesystem scan and reshapes
//! the result for its endpoint. Failures map to a JSON error body: missing
//! sessions or projects are 404, everything else is a server fault.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::analytics::{insights, Aggregator, ScanSummary};
use crate::discovery::DataDirectory;
use crate::error::PulseError;
use crate::model::{HistoryEntry, ModelTokenTotals, SessionRecord, UsageCache};
use crate::parser::JsonlParser;
use crate::pricing::{estimate_cost, CostEstimate};
use crate::report::{self, ReportSummary};

use super::AppContext;

/// Default number of date groups returned by the history endpoint.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Days covered by the timeline endpoint.
pub const TIMELINE_DAYS: i64 = 7;

/// Error payload: `{"error": "..."}` with a matching status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<PulseError> for ApiError {
    fn from(err: PulseError) -> Self {
        match err {
            PulseError::SessionNotFound { .. }
            | PulseError::ProjectNotFound { .. }
            | PulseError::FileNotFound { .. } => Self::not_found(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Scan the data directory fresh for this request.
fn fresh_scan(data: &DataDirectory) -> Result<ScanSummary, PulseError> {
    Aggregator::new().scan(data)
}

/// `GET /api/stats` — summary stats: trusted cache totals merged with a
/// fresh scan.
pub async fn stats(State(ctx): State<Arc<AppContext>>) -> Result<Json<StatsResponse>, ApiError> {
    let scan = fresh_scan(&ctx.data)?;
    let cache = ctx.data.load_usage_cache()?;
    let report = report::build_report(&scan, cache.as_ref(), Utc::now());

    Ok(Json(StatsResponse {
        summary: report.summary,
        tool_usage: report.tool_usage,
        git_branches: report.git_branches,
        hourly_activity: report.hourly_activity,
        weekday_activity: report.weekday_activity,
    }))
}

/// Response body for `/api/stats`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Headline totals.
    pub summary: ReportSummary,
    /// Top tools.
    pub tool_usage: Vec<report::CountEntry>,
    /// Top branches.
    pub git_branches: Vec<report::CountEntry>,
    /// 24 hourly buckets.
    pub hourly_activity: Vec<u64>,
    /// 7 weekday buckets.
    pub weekday_activity: Vec<u64>,
}

/// `GET /api/projects` — all projects, most recently active first.
pub async fn projects(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Vec<ProjectListing>>, ApiError> {
    let scan = fresh_scan(&ctx.data)?;

    let mut listings: Vec<ProjectListing> = scan
        .projects
        .into_iter()
        .map(|p| ProjectListing {
            name: p.encoded_name,
            display_name: p.display_name,
            sessions: p.session_count,
            messages: p.message_count,
            tool_calls: p.tool_call_count,
            branches: p.branches,
            last_activity: p.last_activity,
        })
        .collect();
    listings.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));

    Ok(Json(listings))
}

/// One project in the `/api/projects` listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListing {
    /// Raw encoded directory name.
    pub name: String,
    /// Best-effort display name.
    pub display_name: String,
    /// Session count.
    pub sessions: u64,
    /// Message count.
    pub messages: u64,
    /// Tool-call count.
    pub tool_calls: u64,
    /// Branches seen.
    pub branches: Vec<String>,
    /// Most recent activity.
    pub last_activity: Option<DateTime<Utc>>,
}

/// Query parameters for `/api/history`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    /// Maximum number of date groups; coerced with a default, never rejected.
    pub limit: Option<String>,
}

/// `GET /api/history?limit=N` — prompt history grouped by date, newest
/// group first, at most N groups.
pub async fn history(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<HistoryGroup>>, ApiError> {
    let limit = params
        .limit
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_HISTORY_LIMIT);

    let mut parser = JsonlParser::new();
    let entries: Vec<HistoryEntry> = parser.parse_file(ctx.data.history_path())?;

    Ok(Json(group_history(entries, limit)))
}

/// One date's worth of history entries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryGroup {
    /// Date ("YYYY-MM-DD").
    pub date: String,
    /// Entries for that date, in input order.
    pub entries: Vec<HistoryEntry>,
}

/// Group history entries by date and keep the last `limit` distinct dates
/// (by input order), newest group first. Entries without a timestamp cannot
/// be dated and are skipped.
#[must_use]
pub fn group_history(entries: Vec<HistoryEntry>, limit: usize) -> Vec<HistoryGroup> {
    let mut groups: IndexMap<String, Vec<HistoryEntry>> = IndexMap::new();
    for entry in entries {
        let Some(date) = entry.date_key() else {
            continue;
        };
        groups.entry(date).or_default().push(entry);
    }

    let keep_from = groups.len().saturating_sub(limit);
    groups
        .into_iter()
        .skip(keep_from)
        .map(|(date, entries)| HistoryGroup { date, entries })
        .rev()
        .collect()
}

/// `GET /api/session/{project}/{id}` — single-session detail.
pub async fn session_detail(
    State(ctx): State<Arc<AppContext>>,
    Path((project, id)): Path<(String, String)>,
) -> Result<Json<SessionDetail>, ApiError> {
    let project = ctx.data.find_project(&project)?;
    let path = project
        .session_path(&id)
        .ok_or_else(|| PulseError::SessionNotFound { session_id: id.clone() })?;

    let mut parser = JsonlParser::new();
    let records: Vec<SessionRecord> = parser.parse_file(&path)?;
    let stats = Aggregator::new().walk_session(&records);

    let duration_seconds = match (stats.started_at, stats.ended_at) {
        (Some(start), Some(end)) => Some((end - start).num_seconds()),
        _ => None,
    };

    Ok(Json(SessionDetail {
        session_id: id,
        project: project.encoded_name().to_string(),
        display_name: project.display_name().to_string(),
        record_count: records.len(),
        messages: stats.message_count,
        tool_calls: stats.tool_calls,
        models: stats.models.into_iter().collect(),
        git_branch: stats.first_branch,
        started_at: stats.started_at,
        ended_at: stats.ended_at,
        duration_seconds,
    }))
}

/// Response body for `/api/session/{project}/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    /// Session identifier.
    pub session_id: String,
    /// Encoded project name.
    pub project: String,
    /// Project display name.
    pub display_name: String,
    /// Parsed records in the file.
    pub record_count: usize,
    /// User/assistant messages.
    pub messages: u64,
    /// Tool calls.
    pub tool_calls: u64,
    /// Model display names used.
    pub models: Vec<String>,
    /// First branch seen.
    pub git_branch: Option<String>,
    /// Earliest in-window timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Latest in-window timestamp.
    pub ended_at: Option<DateTime<Utc>>,
    /// End minus start, in seconds.
    pub duration_seconds: Option<i64>,
}

/// `GET /api/timeline` — the last 7 days, cache merged with fresh scan.
pub async fn timeline(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Vec<TimelineDay>>, ApiError> {
    let scan = fresh_scan(&ctx.data)?;
    let cache = ctx.data.load_usage_cache()?;

    Ok(Json(build_timeline(&scan, cache.as_ref(), Utc::now())))
}

/// One day in the timeline.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDay {
    /// Date ("YYYY-MM-DD").
    pub date: String,
    /// Messages that day (max of cache and fresh scan).
    pub messages: u64,
    /// Sessions that day (cache only).
    pub sessions: u64,
    /// Tokens that day (cache only).
    pub tokens: u64,
}

/// Merge cached daily stats with freshly scanned counts over a fixed
/// trailing window ending at `now`.
#[must_use]
pub fn build_timeline(
    scan: &ScanSummary,
    cache: Option<&UsageCache>,
    now: DateTime<Utc>,
) -> Vec<TimelineDay> {
    let mut days = Vec::with_capacity(TIMELINE_DAYS as usize);

    for offset in (0..TIMELINE_DAYS).rev() {
        let date = (now - Duration::days(offset)).format("%Y-%m-%d").to_string();
        let mut day = TimelineDay {
            date: date.clone(),
            ..Default::default()
        };

        if let Some(activity) = cache.and_then(|c| c.daily_activity.get(&date)) {
            day.messages = activity.messages;
            day.sessions = activity.sessions;
            day.tokens = activity.tokens;
        }
        if let Some(count) = scan.daily.get(&date) {
            day.messages = day.messages.max(*count);
        }

        days.push(day);
    }

    days
}

/// `GET /api/dashboard` — headline summary plus per-model cost breakdown.
pub async fn dashboard(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let scan = fresh_scan(&ctx.data)?;
    let cache = ctx.data.load_usage_cache()?;
    let report = report::build_report(&scan, cache.as_ref(), Utc::now());

    let models = report::merged_model_tokens(&scan, cache.as_ref())
        .into_iter()
        .map(|(model, tokens)| {
            let cost = estimate_cost(&model, &tokens);
            let sessions = scan.model_session_counts.get(&model).copied().unwrap_or(0);
            ModelCostBreakdown {
                model,
                sessions,
                tokens,
                cost,
            }
        })
        .collect();

    Ok(Json(DashboardSummary {
        summary: report.summary,
        model_usage: models,
        daily_activity: report.daily_activity,
        insights: insights::generate(&scan),
    }))
}

/// Response body for `/api/dashboard`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Headline totals.
    pub summary: ReportSummary,
    /// Per-model token and cost breakdown.
    pub model_usage: Vec<ModelCostBreakdown>,
    /// Merged per-day activity.
    pub daily_activity: Vec<report::DayEntry>,
    /// Ordered observations.
    pub insights: Vec<String>,
}

/// Token totals and cost for one model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCostBreakdown {
    /// Model display name.
    pub model: String,
    /// Sessions that used the model (fresh scan).
    pub sessions: u64,
    /// Token totals.
    pub tokens: ModelTokenTotals,
    /// Cost breakdown by token category.
    pub cost: CostEstimate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(date: &str, text: &str) -> HistoryEntry {
        serde_json::from_str(&format!(
            r#"{{"timestamp":"{date}T10:00:00Z","display":"{text}","project":"/p","sessionId":"s"}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_group_history_limit() {
        let entries = vec![
            entry("2026-08-01", "a"),
            entry("2026-08-01", "b"),
            entry("2026-08-02", "c"),
            entry("2026-08-03", "d"),
            entry("2026-08-03", "e"),
        ];

        let groups = group_history(entries, 2);
        assert_eq!(groups.len(), 2);
        // Newest group first, each group in input order
        assert_eq!(groups[0].date, "2026-08-03");
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[1].date, "2026-08-02");
    }

    #[test]
    fn test_group_history_skips_undated() {
        let undated: HistoryEntry = serde_json::from_str(r#"{"display":"x"}"#).unwrap();
        let groups = group_history(vec![undated, entry("2026-08-01", "a")], 10);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].entries.len(), 1);
    }

    #[test]
    fn test_group_history_zero_limit() {
        let groups = group_history(vec![entry("2026-08-01", "a")], 0);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_build_timeline_is_seven_days() {
        let now = Utc.with_ymd_and_hms(2026, 8, 8, 12, 0, 0).unwrap();
        let days = build_timeline(&ScanSummary::default(), None, now);

        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, "2026-08-02");
        assert_eq!(days[6].date, "2026-08-08");
    }

    #[test]
    fn test_build_timeline_merges_cache_and_scan() {
        let now = Utc.with_ymd_and_hms(2026, 8, 8, 12, 0, 0).unwrap();
        let cache: UsageCache = serde_json::from_str(
            r#"{"dailyActivity": {"2026-08-07": {"messages": 2, "sessions": 1, "tokens": 900}}}"#,
        )
        .unwrap();
        let mut scan = ScanSummary::default();
        scan.daily.insert("2026-08-07".to_string(), 5);
        scan.daily.insert("2026-08-08".to_string(), 3);

        let days = build_timeline(&scan, Some(&cache), now);
        let yesterday = days.iter().find(|d| d.date == "2026-08-07").unwrap();
        assert_eq!(yesterday.messages, 5); // scan ahead of cache
        assert_eq!(yesterday.tokens, 900); // tokens only the cache knows
        let today = days.iter().find(|d| d.date == "2026-08-08").unwrap();
        assert_eq!(today.messages, 3);
        assert_eq!(today.tokens, 0);
    }

    #[test]
    fn test_api_error_payload_shape() {
        let err = ApiError::from(PulseError::server("scan failed"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_errors_map_to_404() {
        let err = ApiError::from(PulseError::SessionNotFound {
            session_id: "x".to_string(),
        });
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = ApiError::from(PulseError::ProjectNotFound {
            project: "-p".to_string(),
        });
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
