//! Human-readable one-line observations derived from a scan summary.
//!
//! Pure presentation over the accumulated numbers; an insight whose input
//! is empty is simply omitted.

use super::ScanSummary;

/// Weekday names, Sunday first, matching the weekday bucket order.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Rough tokens-to-words conversion factor.
const WORDS_PER_TOKEN: f64 = 0.75;

/// Generate the ordered insight list for a scan summary.
#[must_use]
pub fn generate(summary: &ScanSummary) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some(hour) = argmax(&summary.hourly) {
        insights.push(format!(
            "Most active hour: {:02}:00-{:02}:00",
            hour,
            (hour + 1) % 24
        ));
    }

    if let Some(day) = argmax(&summary.weekday) {
        insights.push(format!("{} is your busiest day", WEEKDAY_NAMES[day]));
    }

    if let Some(project) = summary.projects.iter().max_by_key(|p| p.session_count) {
        if project.session_count > 0 {
            insights.push(format!(
                "Top project: {} ({} sessions)",
                project.display_name, project.session_count
            ));
        }
    }

    if let Some((tool, count)) = summary.tool_counts.iter().max_by_key(|(_, c)| **c) {
        insights.push(format!("Most used tool: {tool} ({count} calls)"));
    }

    if let Some((model, tokens)) = summary
        .model_tokens
        .iter()
        .max_by_key(|(_, t)| t.output_tokens)
    {
        if tokens.output_tokens > 0 {
            insights.push(format!("{model} generated the most output tokens"));
        }
    }

    let output_tokens: u64 = summary.model_tokens.values().map(|t| t.output_tokens).sum();
    if output_tokens > 0 {
        let words = (output_tokens as f64 * WORDS_PER_TOKEN) as u64;
        insights.push(format!("Roughly {words} words of output generated"));
    }

    let active = summary.active_days();
    if active > 0 {
        insights.push(format!(
            "Active on {active} day{} in the last 6 months",
            if active == 1 { "" } else { "s" }
        ));
    }

    insights
}

/// Index of the largest non-zero bucket, first index winning ties.
fn argmax(buckets: &[u64]) -> Option<usize> {
    let (index, max) = buckets
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))?;
    if *max == 0 {
        None
    } else {
        Some(index)
    }
}
