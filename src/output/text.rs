//! Plain-text report
//!
//! Renders the three console tables: URLs by ascending download time, asset
//! types by ascending aggregate time with their share of the total, and the
//! grand total. Failed downloads, if any, get their own section.

use crate::output::report::TimingReport;

const RULE_WIDTH: usize = 80;

/// Formats a report as console text
pub fn format_text_report(report: &TimingReport) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    let by_url = report.by_url();
    let by_type = report.by_type();

    // Right-align seconds to the widest value in each table
    let url_width = seconds_width(by_url.iter().map(|t| t.seconds));
    let type_width = seconds_width(by_type.iter().map(|t| t.seconds));

    out.push_str(&format!("{}\n", rule));
    out.push_str("Download times by URL:\n");
    for timing in &by_url {
        out.push_str(&format!(
            "{:>width$.2} {}\n",
            timing.seconds,
            timing.url,
            width = url_width
        ));
    }

    out.push_str(&format!("{}\n", rule));
    out.push_str("Download times by asset type:\n");
    for timing in &by_type {
        out.push_str(&format!(
            "{:>width$.2} {:>6.2}% {}\n",
            timing.seconds,
            timing.percent,
            timing.asset_type,
            width = type_width
        ));
    }

    if !report.failures().is_empty() {
        out.push_str(&format!("{}\n", rule));
        out.push_str("Failed downloads:\n");
        for failure in report.failures() {
            out.push_str(&format!(
                "{} {}: {}\n",
                failure.asset_type, failure.url, failure.message
            ));
        }
    }

    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!(
        "Total download seconds: {:.2}\n",
        report.total_seconds()
    ));

    out
}

/// Width of the longest two-decimal rendering among `values`
fn seconds_width(values: impl Iterator<Item = f64>) -> usize {
    values
        .map(|seconds| format!("{:.2}", seconds).len())
        .max()
        .unwrap_or(0)
}
