//! JSON report

use crate::output::report::{TimingReport, TypeTiming, UrlTiming};
use crate::state::{AssetType, FetchFailure};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Serialized shape of a report
#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    root_url: &'a str,
    generated_at: DateTime<Utc>,
    total_seconds: f64,
    by_url: Vec<UrlTiming>,
    by_type: Vec<TypeTiming>,
    failures: &'a [FetchFailure],
    links_by_type: &'a BTreeMap<AssetType, BTreeSet<String>>,
}

/// Formats a report as pretty-printed JSON
pub fn format_json_report(report: &TimingReport) -> Result<String, serde_json::Error> {
    let document = ReportDocument {
        root_url: report.root_url(),
        generated_at: report.generated_at(),
        total_seconds: report.total_seconds(),
        by_url: report.by_url(),
        by_type: report.by_type(),
        failures: report.failures(),
        links_by_type: report.links_by_type(),
    };

    serde_json::to_string_pretty(&document)
}
