//! Timing aggregation
//!
//! `TimingReport` is the read-only result of a crawl. It holds the per-URL
//! and per-type timing tables and derives the sorted views and totals the
//! formatters print.

use crate::state::{AssetType, CrawlState, FetchFailure};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Download time of a single URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlTiming {
    pub url: String,
    pub seconds: f64,
}

/// Aggregate download time of one asset class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeTiming {
    pub asset_type: AssetType,
    pub seconds: f64,
    /// Share of the total download time, `0.0` when nothing was downloaded
    pub percent: f64,
}

/// Results of a completed crawl
#[derive(Debug, Clone)]
pub struct TimingReport {
    root_url: String,
    generated_at: DateTime<Utc>,
    times_by_url: HashMap<String, f64>,
    times_by_type: HashMap<AssetType, f64>,
    links_by_type: BTreeMap<AssetType, BTreeSet<String>>,
    fetch_order: Vec<String>,
    failures: Vec<FetchFailure>,
}

impl TimingReport {
    /// Builds a report from the final state of a crawl
    pub fn from_state(root_url: &str, state: &CrawlState) -> Self {
        Self {
            root_url: root_url.to_string(),
            generated_at: Utc::now(),
            times_by_url: state.times_by_url().clone(),
            times_by_type: state.times_by_type().clone(),
            links_by_type: state.links_by_type().clone(),
            fetch_order: state.fetch_order().to_vec(),
            failures: state.failures().to_vec(),
        }
    }

    /// Sum of the download times of every successfully fetched URL
    ///
    /// `0.0` when nothing was downloaded.
    pub fn total_seconds(&self) -> f64 {
        // Folding from +0.0 keeps an empty sum from printing as "-0.00"
        self.times_by_url.values().fold(0.0, |total, seconds| total + seconds)
    }

    /// Per-URL times, ascending by duration
    pub fn by_url(&self) -> Vec<UrlTiming> {
        let mut timings: Vec<UrlTiming> = self
            .times_by_url
            .iter()
            .map(|(url, seconds)| UrlTiming {
                url: url.clone(),
                seconds: *seconds,
            })
            .collect();

        timings.sort_by(|a, b| {
            a.seconds
                .total_cmp(&b.seconds)
                .then_with(|| a.url.cmp(&b.url))
        });
        timings
    }

    /// Per-type times with share of total, ascending by duration
    ///
    /// Empty when no download succeeded.
    pub fn by_type(&self) -> Vec<TypeTiming> {
        let total = self.total_seconds();

        let mut timings: Vec<TypeTiming> = self
            .times_by_type
            .iter()
            .map(|(asset_type, seconds)| TypeTiming {
                asset_type: *asset_type,
                seconds: *seconds,
                percent: percent_of(*seconds, total),
            })
            .collect();

        timings.sort_by(|a, b| {
            a.seconds
                .total_cmp(&b.seconds)
                .then_with(|| a.asset_type.cmp(&b.asset_type))
        });
        timings
    }

    /// Time booked for one asset class
    pub fn seconds_for(&self, asset_type: AssetType) -> f64 {
        self.times_by_type.get(&asset_type).copied().unwrap_or(0.0)
    }

    /// Time of one URL, if it was downloaded
    pub fn seconds_for_url(&self, url: &str) -> Option<f64> {
        self.times_by_url.get(url).copied()
    }

    /// Number of successful downloads
    pub fn fetch_count(&self) -> usize {
        self.times_by_url.len()
    }

    /// Returns true if no download succeeded
    pub fn is_empty(&self) -> bool {
        self.times_by_url.is_empty()
    }

    /// URLs in the order their downloads were booked
    pub fn fetch_order(&self) -> &[String] {
        &self.fetch_order
    }

    /// Downloads that failed and were skipped
    pub fn failures(&self) -> &[FetchFailure] {
        &self.failures
    }

    /// Every raw link discovered per class, including filtered ones
    pub fn links_by_type(&self) -> &BTreeMap<AssetType, BTreeSet<String>> {
        &self.links_by_type
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

/// `part / total * 100`, or `0.0` for an empty total
fn percent_of(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}
