//! Crawl engine - breadth-first download orchestration
//!
//! This module contains the main crawl loop, which:
//! - Seeds the queue with the root page
//! - Takes the next frontier of queued items and claims their URLs
//! - Downloads claimed URLs, up to `concurrency` at a time
//! - Books the timings in queue order
//! - Extracts asset links from HTML and queues the new ones

use crate::config::{Config, CrawlerConfig, ErrorPolicy};
use crate::crawler::extractor::{is_candidate, AssetPatterns, ExtractedAssets};
use crate::crawler::fetcher::{FetchRecord, FetchTimer};
use crate::output::TimingReport;
use crate::state::{AssetType, CrawlState, EngineState, FetchFailure, Progress, WorkItem};
use crate::url::{extract_domain, resolve};
use crate::{FetchError, WebTimerError};
use futures::stream::{self, StreamExt};
use url::Url;

/// Longest URL prefix shown in progress lines
const PROGRESS_URL_WIDTH: usize = 60;

/// One dequeued item and what to do with it
enum Job {
    /// URL was claimed by this item and must be downloaded
    Fetch { item: WorkItem, url: String },
    /// URL was claimed earlier; reuse its record
    ///
    /// The queue dedupes resolved URLs, so a crawl started by `evaluate`
    /// only gets here for a URL claimed outside the queue.
    Cached { item: WorkItem, url: String },
}

/// Outcome of a job, applied to the crawl state in queue order
struct Outcome {
    item: WorkItem,
    url: String,
    result: Option<Result<FetchRecord, FetchError>>,
}

/// Drives one crawl from the root page to an empty queue
pub struct CrawlEngine {
    fetcher: FetchTimer,
    settings: CrawlerConfig,
    patterns: AssetPatterns,
    state: EngineState,
}

impl CrawlEngine {
    /// Creates an engine around an existing fetcher
    pub fn new(fetcher: FetchTimer, settings: CrawlerConfig) -> Self {
        Self {
            fetcher,
            settings,
            patterns: AssetPatterns::default(),
            state: EngineState::Idle,
        }
    }

    /// Creates an engine with a fetcher built from the configuration
    pub fn from_config(config: &Config) -> Result<Self, WebTimerError> {
        let fetcher = FetchTimer::from_config(config)?;
        Ok(Self::new(fetcher, config.crawler.clone()))
    }

    /// Replaces the link extraction patterns
    pub fn with_patterns(mut self, patterns: AssetPatterns) -> Self {
        self.patterns = patterns;
        self
    }

    /// Returns the engine's lifecycle state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Measures the page at `root_url` and every asset it links to
    ///
    /// # Flow
    ///
    /// 1. `Idle -> Traversing`: derive the domain from the root URL's
    ///    authority and queue `(HTML, root_url)`
    /// 2. While the queue is not empty, take up to `concurrency` items from
    ///    its head, resolve and claim their URLs, download the claimed ones
    ///    concurrently, then for each item in queue order:
    ///    a. book the download under the item's asset type (or reuse the
    ///       record when the URL was already downloaded)
    ///    b. for HTML, extract links, resolve them, drop non-stylesheet
    ///       `<link>` targets and queue every URL not seen before
    /// 3. `Traversing -> Done` once the queue is empty
    ///
    /// A failed download is recorded and skipped, or aborts the crawl when
    /// the error policy is `abort`. An aborted crawl still hands back the
    /// timings booked so far inside `WebTimerError::Aborted`.
    ///
    /// # Returns
    ///
    /// * `Ok(TimingReport)` - Timings of every successful download
    /// * `Err(WebTimerError)` - Invalid root URL, engine reuse, or an aborted crawl
    pub async fn evaluate(&mut self, root_url: &str) -> Result<TimingReport, WebTimerError> {
        self.transition(EngineState::Traversing)?;

        let domain = match root_domain(root_url) {
            Ok(domain) => domain,
            Err(e) => {
                self.transition(EngineState::Done)?;
                return Err(e);
            }
        };

        tracing::info!("Measuring {} (domain {})", root_url, domain);

        let mut crawl = CrawlState::new(WorkItem::new(AssetType::Html, root_url));

        while !crawl.is_empty() {
            self.transition(EngineState::Traversing)?;

            let jobs = self.claim_frontier(&mut crawl, &domain);
            let outcomes = self.run_jobs(jobs).await;

            for outcome in outcomes {
                if let Err(source) = self.apply_outcome(&mut crawl, outcome, &domain) {
                    self.transition(EngineState::Done)?;
                    let report = TimingReport::from_state(root_url, &crawl);
                    tracing::error!(
                        "Aborting after {} downloads: {}",
                        report.fetch_count(),
                        source
                    );
                    return Err(WebTimerError::Aborted {
                        source,
                        report: Box::new(report),
                    });
                }
            }
        }

        self.transition(EngineState::Done)?;

        let report = TimingReport::from_state(root_url, &crawl);
        tracing::info!(
            "Measured {} resources in {:.2}s total download time ({} failed)",
            report.fetch_count(),
            report.total_seconds(),
            report.failures().len()
        );

        Ok(report)
    }

    /// Moves the engine to `next`, rejecting illegal transitions
    fn transition(&mut self, next: EngineState) -> Result<(), WebTimerError> {
        if !self.state.can_transition_to(next) {
            return Err(WebTimerError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Takes the next frontier off the queue and claims its URLs
    ///
    /// Claiming happens here, before any download starts, so the same URL is
    /// never downloaded twice even with several requests in flight.
    fn claim_frontier(&self, crawl: &mut CrawlState, domain: &str) -> Vec<Job> {
        let batch = crawl.take_frontier(self.settings.concurrency.max(1));
        let batch_len = batch.len();
        let done_before = crawl.progress().completed;

        batch
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let url = resolve(&item.url, domain);

                let progress = Progress {
                    completed: done_before + index + 1,
                    remaining: crawl.pending_len() + (batch_len - index - 1),
                };
                tracing::info!(
                    "Measuring {} of {} {:.2}%: {}",
                    progress.completed,
                    progress.total(),
                    progress.percent(),
                    truncate_url(&url)
                );

                if crawl.claim(&url) {
                    Job::Fetch { item, url }
                } else {
                    Job::Cached { item, url }
                }
            })
            .collect()
    }

    /// Downloads the claimed jobs, at most `concurrency` at a time
    ///
    /// Outcomes come back in the order the jobs were given.
    async fn run_jobs(&self, jobs: Vec<Job>) -> Vec<Outcome> {
        let fetcher = &self.fetcher;

        stream::iter(jobs)
            .map(move |job| async move {
                match job {
                    Job::Fetch { item, url } => {
                        let result = fetcher.fetch(&url).await;
                        Outcome {
                            item,
                            url,
                            result: Some(result),
                        }
                    }
                    Job::Cached { item, url } => Outcome {
                        item,
                        url,
                        result: None,
                    },
                }
            })
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await
    }

    /// Books one outcome and queues the links it reveals
    fn apply_outcome(
        &self,
        crawl: &mut CrawlState,
        outcome: Outcome,
        domain: &str,
    ) -> Result<(), FetchError> {
        let Outcome { item, url, result } = outcome;

        match result {
            Some(Ok(record)) => {
                tracing::debug!(
                    "{} {} took {:.3}s",
                    item.asset_type,
                    url,
                    record.elapsed_seconds()
                );
                crawl.record_fetch(item.asset_type, record);
            }
            Some(Err(e)) => {
                crawl.record_failure(FetchFailure {
                    url: url.clone(),
                    asset_type: item.asset_type,
                    message: error_message(&e),
                });
                crawl.mark_completed();

                return match self.settings.on_error {
                    ErrorPolicy::Abort => Err(e),
                    ErrorPolicy::Skip => {
                        tracing::warn!("Skipping {}: {}", url, e);
                        Ok(())
                    }
                };
            }
            None if crawl.is_fetched(&url) => {
                tracing::debug!("Reusing cached download of {}", url);
            }
            None => {
                tracing::debug!("{} already attempted without success", url);
            }
        }

        crawl.mark_completed();

        if item.asset_type.is_page() {
            let discovered = crawl
                .record(&url)
                .map(|record| self.patterns.extract(&record.body));

            if let Some(discovered) = discovered {
                self.enqueue_discovered(crawl, &discovered, domain);
            }
        }

        Ok(())
    }

    /// Queues newly discovered links, class by class in discovery order
    fn enqueue_discovered(&self, crawl: &mut CrawlState, discovered: &ExtractedAssets, domain: &str) {
        for (asset_type, links) in discovered.iter() {
            crawl.record_links(asset_type, links);

            for link in links {
                if !is_candidate(asset_type, link) {
                    tracing::debug!("Ignoring non-stylesheet link {}", link);
                    continue;
                }

                if let Some(max) = self.settings.max_resources {
                    if crawl.claimed_count() + crawl.pending_len() >= max {
                        tracing::debug!("Resource cap of {} reached, not queueing {}", max, link);
                        continue;
                    }
                }

                let url = resolve(link, domain);
                if crawl.enqueue(WorkItem::new(asset_type, url.clone())) {
                    tracing::debug!("Queued {} {}", asset_type, url);
                }
            }
        }
    }
}

/// Derives the domain root-relative links are resolved against
fn root_domain(root_url: &str) -> Result<String, WebTimerError> {
    let parsed = Url::parse(root_url)?;
    extract_domain(&parsed).ok_or_else(|| WebTimerError::MissingDomain(root_url.to_string()))
}

/// Formats a fetch error with its underlying cause
fn error_message(error: &FetchError) -> String {
    use std::error::Error;

    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

/// Shortens a URL for progress output
fn truncate_url(url: &str) -> &str {
    match url.char_indices().nth(PROGRESS_URL_WIDTH) {
        Some((index, _)) => &url[..index],
        None => url,
    }
}
