//! State module for tracking crawl progress
//!
//! This module provides the data model of a single crawl.
//!
//! # Components
//!
//! - `AssetType`: The class a downloaded resource was discovered as
//! - `WorkItem`: A pending download, pairing a URL with its asset type
//! - `EngineState`: Lifecycle of the crawl engine (idle, traversing, done)
//! - `CrawlState`: Queue, visited set and timing tables of one traversal

mod asset_type;
mod crawl_state;
mod engine_state;

// Re-export main types
pub use asset_type::{AssetType, WorkItem};
pub use crawl_state::{CrawlState, FetchFailure, Progress};
pub use engine_state::EngineState;
