//! Usage-cache snapshot types.
//!
//! The cache file is maintained externally and treated as a trusted
//! precomputed aggregate. It is merged with freshly scanned per-session
//! detail; a malformed cache aborts only the cache-derived portion of a
//! report, never the scan.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Precomputed aggregate snapshot, read from `usage-cache.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageCache {
    /// Total sessions ever recorded.
    pub total_sessions: u64,

    /// Total messages ever recorded.
    pub total_messages: u64,

    /// Per-model token totals, keyed by display name.
    pub model_usage: IndexMap<String, ModelTokenTotals>,

    /// Per-day activity, keyed by "YYYY-MM-DD".
    pub daily_activity: IndexMap<String, DayActivity>,

    /// Message counts per hour of day (24 entries when present).
    pub hour_counts: Vec<u64>,

    /// Per-day, per-model token totals: date → model → totals.
    pub daily_model_tokens: IndexMap<String, IndexMap<String, ModelTokenTotals>>,

    /// Longest session on record; passed through as-is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_session: Option<Value>,

    /// Date of the first recorded session ("YYYY-MM-DD").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_session_date: Option<String>,

    /// Unknown fields, preserved.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Token totals for one model, as stored in the cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelTokenTotals {
    /// Fresh input tokens.
    pub input_tokens: u64,
    /// Generated output tokens.
    pub output_tokens: u64,
    /// Cache-write tokens.
    pub cache_creation_input_tokens: u64,
    /// Cache-read tokens.
    pub cache_read_input_tokens: u64,
}

impl ModelTokenTotals {
    /// Total tokens across all categories.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.input_tokens
            + self.output_tokens
            + self.cache_creation_input_tokens
            + self.cache_read_input_tokens
    }

    /// Accumulate another total into this one.
    pub fn merge(&mut self, other: &Self) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.cache_creation_input_tokens += other.cache_creation_input_tokens;
        self.cache_read_input_tokens += other.cache_read_input_tokens;
    }
}

/// One day's activity, as stored in the cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayActivity {
    /// Messages logged that day.
    pub messages: u64,
    /// Sessions active that day.
    pub sessions: u64,
    /// Tokens consumed that day.
    pub tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_roundtrip() {
        let json = r#"{
            "totalSessions": 42,
            "totalMessages": 1234,
            "modelUsage": {"Opus": {"inputTokens": 100, "outputTokens": 200}},
            "dailyActivity": {"2026-08-01": {"messages": 10, "sessions": 2, "tokens": 5000}},
            "hourCounts": [0,0,0,0,0,0,0,0,0,12,30,5,0,0,0,0,0,0,0,0,0,0,0,0],
            "dailyModelTokens": {"2026-08-01": {"Opus": {"inputTokens": 50}}},
            "firstSessionDate": "2025-11-02"
        }"#;

        let cache: UsageCache = serde_json::from_str(json).unwrap();
        assert_eq!(cache.total_sessions, 42);
        assert_eq!(cache.total_messages, 1234);
        assert_eq!(cache.model_usage["Opus"].output_tokens, 200);
        assert_eq!(cache.daily_activity["2026-08-01"].messages, 10);
        assert_eq!(cache.hour_counts.len(), 24);
        assert_eq!(cache.first_session_date.as_deref(), Some("2025-11-02"));
    }

    #[test]
    fn test_cache_tolerates_missing_fields() {
        let cache: UsageCache = serde_json::from_str("{}").unwrap();
        assert_eq!(cache.total_sessions, 0);
        assert!(cache.daily_activity.is_empty());
        assert!(cache.longest_session.is_none());
    }

    #[test]
    fn test_model_token_totals_merge() {
        let mut a = ModelTokenTotals {
            input_tokens: 10,
            output_tokens: 20,
            ..Default::default()
        };
        let b = ModelTokenTotals {
            input_tokens: 5,
            cache_read_input_tokens: 100,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.input_tokens, 15);
        assert_eq!(a.cache_read_input_tokens, 100);
        assert_eq!(a.total(), 135);
    }
}
