//! End-to-end tests over a synthetic data directory.
//!
//! These build a real `projects/` tree plus cache and history files in a
//! temp directory, then drive the public API the way both binary modes do.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use claude_pulse::analytics::Aggregator;
use claude_pulse::discovery::DataDirectory;
use claude_pulse::model::HistoryEntry;
use claude_pulse::parser::JsonlParser;
use claude_pulse::report::{build_report, write_report};
use claude_pulse::server::routes::group_history;

const UUID_A: &str = "40afc8a7-3fcb-4d29-b1ee-100b81b8c6c0";
const UUID_B: &str = "b2f1c000-1111-4d29-b1ee-222233334444";

/// Session file with 3 user/assistant records and one `tool_use` block.
const SESSION_A: &str = concat!(
    r#"{"type":"user","timestamp":"2026-08-01T10:00:00Z","gitBranch":"main","message":{"role":"user","content":"read the file"}}"#,
    "\n",
    r#"{"type":"assistant","timestamp":"2026-08-01T10:00:05Z","message":{"role":"assistant","model":"claude-opus-4-5-20251101","content":[{"type":"tool_use","name":"Read","id":"t1","input":{}}],"usage":{"input_tokens":100,"output_tokens":40}}}"#,
    "\n",
    r#"{"type":"user","timestamp":"2026-08-01T10:01:00Z","message":{"role":"user","content":"thanks"}}"#,
    "\n",
);

/// Session file with a single user record and no timestamp.
const SESSION_B: &str = concat!(r#"{"type":"user","message":{"role":"user","content":"hi"}}"#, "\n");

fn fixture() -> (TempDir, DataDirectory) {
    let dir = tempfile::tempdir().unwrap();
    let project_dir = dir.path().join("projects").join("-home-u-demo");
    std::fs::create_dir_all(&project_dir).unwrap();

    std::fs::write(project_dir.join(format!("{UUID_A}.jsonl")), SESSION_A).unwrap();
    std::fs::write(project_dir.join(format!("{UUID_B}.jsonl")), SESSION_B).unwrap();

    std::fs::write(
        dir.path().join("usage-cache.json"),
        r#"{
            "totalSessions": 50,
            "totalMessages": 2,
            "modelUsage": {"Opus": {"inputTokens": 1000000, "outputTokens": 100000}},
            "dailyActivity": {"2026-08-01": {"messages": 1, "sessions": 1, "tokens": 140}},
            "firstSessionDate": "2025-11-02"
        }"#,
    )
    .unwrap();

    std::fs::write(
        dir.path().join("history.jsonl"),
        concat!(
            r#"{"timestamp":"2026-07-30T08:00:00Z","display":"one","project":"/home/u/demo","sessionId":"s1"}"#,
            "\n",
            r#"{"timestamp":"2026-07-31T08:00:00Z","display":"two","project":"/home/u/demo","sessionId":"s2"}"#,
            "\n",
            r#"{"timestamp":"2026-08-01T08:00:00Z","display":"three","project":"/home/u/demo","sessionId":"s3"}"#,
            "\n",
            r#"{"timestamp":"2026-08-01T09:00:00Z","display":"four","project":"/home/u/demo","sessionId":"s3"}"#,
            "\n",
            r#"{"timestamp":"2026-08-02T09:00:00Z","display":"five","project":"/home/u/demo","sessionId":"s4"}"#,
            "\n",
        ),
    )
    .unwrap();

    let data = DataDirectory::from_path(dir.path()).unwrap();
    (dir, data)
}

fn anchored_aggregator() -> Aggregator {
    Aggregator::with_now(Utc.with_ymd_and_hms(2026, 8, 8, 12, 0, 0).unwrap())
}

#[test]
fn scan_reports_project_example_counts() {
    let (_dir, data) = fixture();
    let summary = anchored_aggregator().scan(&data).unwrap();

    assert_eq!(summary.session_count, 2);
    assert_eq!(summary.message_count, 4);
    assert_eq!(summary.tool_call_count, 1);
    assert_eq!(summary.tool_counts["Read"], 1);
    assert_eq!(summary.branch_counts["main"], 1);

    let project = &summary.projects[0];
    assert_eq!(project.encoded_name, "-home-u-demo");
    assert_eq!(project.display_name, "demo");
    assert_eq!(project.session_count, 2);
    assert_eq!(project.message_count, 4);
    assert_eq!(project.tool_call_count, 1);
}

#[test]
fn malformed_line_does_not_change_other_counts() {
    let (dir, data) = fixture();

    // Append a malformed line to session B
    let path = dir
        .path()
        .join("projects")
        .join("-home-u-demo")
        .join(format!("{UUID_B}.jsonl"));
    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push_str("{bad json\n");
    std::fs::write(&path, content).unwrap();

    let summary = anchored_aggregator().scan(&data).unwrap();
    assert_eq!(summary.message_count, 4);
    assert_eq!(summary.tool_call_count, 1);
}

#[test]
fn buckets_cover_only_timestamped_records() {
    let (_dir, data) = fixture();
    let summary = anchored_aggregator().scan(&data).unwrap();

    // Three timestamped records in session A; session B has none
    assert_eq!(summary.hourly.iter().sum::<u64>(), 3);
    assert_eq!(summary.weekday.iter().sum::<u64>(), 3);
    assert_eq!(summary.daily["2026-08-01"], 3);
}

#[test]
fn report_merges_cache_and_scan() {
    let (_dir, data) = fixture();
    let aggregator = anchored_aggregator();
    let summary = aggregator.scan(&data).unwrap();
    let cache = data.load_usage_cache().unwrap();

    let report = build_report(&summary, cache.as_ref(), aggregator.now());

    // Cache is ahead on sessions, scan is ahead on messages
    assert_eq!(report.summary.total_sessions, 50);
    assert_eq!(report.summary.total_messages, 4);
    // Cache tokens win for the model both sources know
    let opus = report.model_usage.iter().find(|m| m.model == "Opus").unwrap();
    assert_eq!(opus.tokens.input_tokens, 1_000_000);
    // Opus at $15/M input + $75/M output: 1M in + 0.1M out = $22.50
    assert_eq!(opus.cost, 22.5);
    assert_eq!(report.date_range.from.as_deref(), Some("2025-11-02"));
    assert!(!report.insights.is_empty());
}

#[test]
fn written_artifact_has_fixed_keys() {
    let (dir, data) = fixture();
    let aggregator = anchored_aggregator();
    let summary = aggregator.scan(&data).unwrap();
    let report = build_report(&summary, None, aggregator.now());

    let out = dir.path().join("dashboard-stats.json");
    write_report(&out, &report).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    for key in [
        "generatedAt",
        "dateRange",
        "summary",
        "modelUsage",
        "toolUsage",
        "dailyActivity",
        "hourlyActivity",
        "weekdayActivity",
        "projects",
        "gitBranches",
        "tokenTrends",
        "insights",
    ] {
        assert!(value.get(key).is_some(), "missing key: {key}");
    }
    assert_eq!(value["hourlyActivity"].as_array().unwrap().len(), 24);
    assert_eq!(value["weekdayActivity"].as_array().unwrap().len(), 7);
}

#[test]
fn history_limit_keeps_trailing_date_groups() {
    let (_dir, data) = fixture();

    let mut parser = JsonlParser::new();
    let entries: Vec<HistoryEntry> = parser.parse_file(data.history_path()).unwrap();
    assert_eq!(entries.len(), 5);

    let groups = group_history(entries, 2);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].date, "2026-08-02");
    assert_eq!(groups[1].date, "2026-08-01");
    assert_eq!(groups[1].entries.len(), 2);
}

#[test]
fn session_lookup_falls_back_to_agent_variant() {
    let (dir, data) = fixture();
    let project_dir = dir.path().join("projects").join("-home-u-demo");
    std::fs::write(project_dir.join("agent-3e533ee.jsonl"), SESSION_B).unwrap();

    let project = data.find_project("-home-u-demo").unwrap();
    assert!(project.session_path("3e533ee").is_some());
    assert!(project.session_path(UUID_A).is_some());
    assert!(project.session_path("does-not-exist").is_none());
}

#[test]
fn missing_data_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let data = DataDirectory::from_path(dir.path()).unwrap();

    let summary = anchored_aggregator().scan(&data).unwrap();
    assert_eq!(summary.session_count, 0);
    assert_eq!(summary.message_count, 0);
    assert!(data.load_usage_cache().unwrap().is_none());
}
