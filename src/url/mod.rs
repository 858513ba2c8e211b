//! URL handling module for webtimer
//!
//! This module turns the links found in markup into fetchable URLs and
//! derives the domain that root-relative links are resolved against.

mod domain;
mod resolve;

// Re-export main functions
pub use domain::extract_domain;
pub use resolve::resolve;
