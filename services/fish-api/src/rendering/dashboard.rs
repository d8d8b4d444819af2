//! Dashboard page listing request logs.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use fish_common::LogRecord;

use super::escape::escape_html;

/// Aggregate figures shown above the log table.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total: usize,
    pub successes: usize,
    pub failures: usize,
    /// Mean of end - start over records that have both.
    pub average_latency_ms: Option<f64>,
    /// Most requested names, most frequent first, ties by name.
    pub top_fish: Vec<(String, usize)>,
}

impl DashboardSummary {
    const TOP_FISH: usize = 5;

    pub fn from_logs(logs: &[LogRecord]) -> Self {
        let successes = logs.iter().filter(|r| r.is_success()).count();

        let latencies: Vec<f64> = logs
            .iter()
            .filter_map(|r| match (r.start_time, r.end_time) {
                (Some(start), Some(end)) => Some((end - start).num_milliseconds() as f64),
                _ => None,
            })
            .collect();
        let average_latency_ms = if latencies.is_empty() {
            None
        } else {
            Some(latencies.iter().sum::<f64>() / latencies.len() as f64)
        };

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in logs {
            *counts.entry(record.fish_name.as_str()).or_default() += 1;
        }
        let mut top_fish: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        top_fish.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_fish.truncate(Self::TOP_FISH);

        Self {
            total: logs.len(),
            successes,
            failures: logs.len() - successes,
            average_latency_ms,
            top_fish,
        }
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Full dashboard page for the given logs.
pub fn render_dashboard(logs: &[LogRecord]) -> String {
    let summary = DashboardSummary::from_logs(logs);
    let mut html = String::with_capacity(2048 + logs.len() * 256);

    html.push_str(DASHBOARD_HEAD);

    let latency = summary
        .average_latency_ms
        .map(|ms| format!("{:.0} ms", ms))
        .unwrap_or_else(|| "n/a".to_string());
    let _ = write!(
        html,
        r#"  <section class="summary">
    <div><span>Total requests</span><strong>{}</strong></div>
    <div><span>Successful</span><strong>{}</strong></div>
    <div><span>Failed</span><strong>{}</strong></div>
    <div><span>Average latency</span><strong>{}</strong></div>
  </section>
"#,
        summary.total, summary.successes, summary.failures, latency
    );

    if !summary.top_fish.is_empty() {
        html.push_str("  <h2>Most requested</h2>\n  <ol class=\"top-fish\">\n");
        for (name, count) in &summary.top_fish {
            let _ = writeln!(html, "    <li>{} ({})</li>", escape_html(name), count);
        }
        html.push_str("  </ol>\n");
    }

    html.push_str(
        "  <h2>Request log</h2>\n  <table>\n    <thead>\n      <tr><th>Fish Name</th><th>Status</th>\
         <th>Message</th><th>Response Code</th><th>Timestamp</th><th>Start Time</th><th>End Time</th></tr>\n    </thead>\n    <tbody>\n",
    );

    if logs.is_empty() {
        html.push_str("      <tr><td colspan=\"7\" class=\"empty\">No logs recorded.</td></tr>\n");
    }

    for record in logs {
        let _ = writeln!(
            html,
            "      <tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            record.status.as_str().to_lowercase(),
            escape_html(&record.fish_name),
            record.status,
            escape_html(&record.message),
            record.response_code,
            format_time(Some(record.timestamp)),
            format_time(record.start_time),
            format_time(record.end_time),
        );
    }

    html.push_str("    </tbody>\n  </table>\n</body>\n</html>\n");
    html
}

const DASHBOARD_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Fish Distribution Dashboard</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 2rem; color: #1a202c; }
    .summary { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
    .summary div { background: #edf2f7; border-radius: 6px; padding: 0.75rem 1rem; }
    .summary span { display: block; font-size: 0.8rem; opacity: 0.7; }
    table { border-collapse: collapse; width: 100%; }
    th, td { border-bottom: 1px solid #e2e8f0; padding: 0.4rem 0.6rem; text-align: left; }
    tr.failure td { color: #c53030; }
    td.empty { text-align: center; opacity: 0.6; }
  </style>
</head>
<body>
  <h1>Fish Distribution Dashboard</h1>
"#;
