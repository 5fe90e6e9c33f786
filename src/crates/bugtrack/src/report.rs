//! Plain-text bug report
//!
//! Rendering for the export endpoint. The report lists bugs in the order
//! given, so callers apply filtering and sorting first.

use chrono::{DateTime, Utc};

use crate::db::models::Bug;

const RULE: &str = "========================================";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn bug_entry(position: usize, bug: &Bug) -> String {
    let mut lines = vec![
        format!("[{position}] {}", bug.title),
        format!("    Severity: {}", bug.severity),
    ];
    if !bug.labels.is_empty() {
        lines.push(format!("    Labels:   {}", bug.labels.join(", ")));
    }
    lines.push(format!("    Created:  {}", format_millis(bug.created_at)));
    if let Some(creator) = &bug.creator {
        lines.push(format!("    Creator:  {}", creator.fullname));
    }
    if let Some(description) = bug.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.extend(description.lines().map(|line| format!("    {}", line.trim_end())));
    }
    lines.join("\n")
}

/// Render the report for `bugs` as a string
pub fn render_report(bugs: &[&Bug], generated_at: DateTime<Utc>) -> String {
    let mut out = format!(
        "Bug report\nGenerated: {}\nBugs: {}\n{RULE}\n",
        generated_at.format(TIMESTAMP_FORMAT),
        bugs.len()
    );

    for (idx, bug) in bugs.iter().enumerate() {
        out.push('\n');
        out.push_str(&bug_entry(idx + 1, bug));
        out.push('\n');
    }

    out
}
