//! Output module for crawl results
//!
//! This module handles:
//! - Aggregating timings into per-URL and per-type views
//! - Rendering the console report
//! - Exporting the report as JSON

mod json;
mod report;
mod text;

pub use json::format_json_report;
pub use report::{TimingReport, TypeTiming, UrlTiming};
pub use text::format_text_report;
