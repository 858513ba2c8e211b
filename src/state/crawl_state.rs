//! Mutable context of a single traversal
//!
//! `CrawlState` owns the pending queue, the visited and claimed sets, the
//! cache of completed downloads and the two timing tables. It is created
//! fresh for every crawl and is only ever touched by the engine loop.

use crate::crawler::FetchRecord;
use crate::state::{AssetType, WorkItem};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// A download that did not produce a timing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    /// The URL that failed
    pub url: String,

    /// The class the URL was discovered under
    pub asset_type: AssetType,

    /// Error message, including the underlying cause
    pub message: String,
}

/// Snapshot of traversal progress
///
/// `remaining` grows as links are discovered, so the percentage is an
/// estimate that can move backwards between snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Items dequeued so far, including the current one
    pub completed: usize,

    /// Items still waiting in the queue
    pub remaining: usize,
}

impl Progress {
    /// Total number of items known so far
    pub fn total(&self) -> usize {
        self.completed + self.remaining
    }

    /// Percentage complete, `completed / (completed + remaining) * 100`
    pub fn percent(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.completed as f64 / total as f64 * 100.0
        }
    }
}

/// Traversal context for one crawl
#[derive(Debug, Default)]
pub struct CrawlState {
    /// URLs that have ever been enqueued; only grows
    visited: HashSet<String>,

    /// FIFO work queue, defines breadth-first order
    pending: VecDeque<WorkItem>,

    /// URLs a download has been started for
    claimed: HashSet<String>,

    /// Completed downloads keyed by URL
    records: HashMap<String, FetchRecord>,

    /// Every raw link seen per class, before resolution and filtering
    links_by_type: BTreeMap<AssetType, BTreeSet<String>>,

    times_by_url: HashMap<String, f64>,
    times_by_type: HashMap<AssetType, f64>,

    /// URLs in the order their downloads were recorded
    fetch_order: Vec<String>,

    failures: Vec<FetchFailure>,

    /// Number of items dequeued and fully handled
    completed: usize,
}

impl CrawlState {
    /// Creates a state whose queue holds only the traversal root
    pub fn new(root: WorkItem) -> Self {
        let mut state = Self::default();
        state.enqueue(root);
        state
    }

    /// Appends an item unless its URL was already enqueued
    ///
    /// Returns true if the item was added.
    pub fn enqueue(&mut self, item: WorkItem) -> bool {
        if !self.visited.insert(item.url.clone()) {
            return false;
        }
        self.pending.push_back(item);
        true
    }

    /// Removes and returns the head of the queue
    pub fn next_item(&mut self) -> Option<WorkItem> {
        self.pending.pop_front()
    }

    /// Removes up to `limit` items from the head of the queue, in order
    pub fn take_frontier(&mut self, limit: usize) -> Vec<WorkItem> {
        let count = limit.min(self.pending.len());
        self.pending.drain(..count).collect()
    }

    /// Marks a URL as having a download in flight
    ///
    /// Returns false if a download was already started for it; the caller
    /// must then reuse the cached record instead of fetching again.
    pub fn claim(&mut self, url: &str) -> bool {
        self.claimed.insert(url.to_string())
    }

    /// Returns the cached download for a URL
    pub fn record(&self, url: &str) -> Option<&FetchRecord> {
        self.records.get(url)
    }

    /// Returns true if a download for this URL has been recorded
    pub fn is_fetched(&self, url: &str) -> bool {
        self.records.contains_key(url)
    }

    /// Stores a completed download and books its time
    ///
    /// The time goes to `times_by_url` and to the bucket of `asset_type`, the
    /// class the URL was discovered under. A second record for the same URL
    /// is ignored and false is returned.
    pub fn record_fetch(&mut self, asset_type: AssetType, record: FetchRecord) -> bool {
        if self.records.contains_key(&record.url) {
            return false;
        }

        let seconds = record.elapsed_seconds();
        self.times_by_url.insert(record.url.clone(), seconds);
        *self.times_by_type.entry(asset_type).or_insert(0.0) += seconds;
        self.fetch_order.push(record.url.clone());
        self.records.insert(record.url.clone(), record);
        true
    }

    /// Stores a failed download
    pub fn record_failure(&mut self, failure: FetchFailure) {
        self.failures.push(failure);
    }

    /// Adds raw discovered links to the per-class link table
    pub fn record_links<'a>(
        &mut self,
        asset_type: AssetType,
        links: impl IntoIterator<Item = &'a String>,
    ) {
        self.links_by_type
            .entry(asset_type)
            .or_default()
            .extend(links.into_iter().cloned());
    }

    /// Counts one dequeued item as handled
    pub fn mark_completed(&mut self) {
        self.completed += 1;
    }

    /// Returns the current progress estimate
    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.completed,
            remaining: self.pending.len(),
        }
    }

    /// Returns true once the queue is drained
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the number of queued items
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns the number of downloads started so far
    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    pub fn times_by_url(&self) -> &HashMap<String, f64> {
        &self.times_by_url
    }

    pub fn times_by_type(&self) -> &HashMap<AssetType, f64> {
        &self.times_by_type
    }

    pub fn links_by_type(&self) -> &BTreeMap<AssetType, BTreeSet<String>> {
        &self.links_by_type
    }

    pub fn fetch_order(&self) -> &[String] {
        &self.fetch_order
    }

    pub fn failures(&self) -> &[FetchFailure] {
        &self.failures
    }
}
