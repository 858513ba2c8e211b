//! Asset link extraction
//!
//! Links are discovered with regular expressions over the raw markup rather
//! than with an HTML parser. Each asset class has its own pattern:
//!
//! - **Javascript**: `<script src="...">`
//! - **CSS**: any `<link ... href="...">`, narrowed afterwards by
//!   [`is_candidate`] to URLs containing `css`
//! - **Image**: `<img src="...">`
//!
//! All patterns are case-insensitive and let `.` cross newlines. The CSS
//! narrowing misses stylesheets whose URL never mentions `css`; that is
//! accepted.

use crate::state::AssetType;
use lazy_static::lazy_static;
use regex::bytes::Regex;
use std::borrow::Cow;
use std::collections::HashSet;

// Unicode mode is off so the patterns also run over bodies that are not
// valid UTF-8.
lazy_static! {
    static ref SCRIPT_SRC: Regex =
        Regex::new(r#"(?is-u)<\s*script\s+src=['"]([^'"]+)['"]"#).unwrap();
    static ref LINK_HREF: Regex =
        Regex::new(r#"(?is-u)<\s*link.*?href=['"]([^'"]+)['"]"#).unwrap();
    static ref IMG_SRC: Regex = Regex::new(r#"(?is-u)<img\s+src=['"]([^'"]+)['"]"#).unwrap();
}

/// Ordered list of (asset class, pattern) pairs applied to a page
#[derive(Debug, Clone)]
pub struct AssetPatterns {
    patterns: Vec<(AssetType, Regex)>,
}

impl AssetPatterns {
    /// Creates a pattern set from explicit pairs
    ///
    /// Each pattern must have its URL in capture group 1.
    pub fn new(patterns: Vec<(AssetType, Regex)>) -> Self {
        Self { patterns }
    }

    /// Returns the asset classes in the order they are applied
    pub fn asset_types(&self) -> impl Iterator<Item = AssetType> + '_ {
        self.patterns.iter().map(|(asset_type, _)| *asset_type)
    }

    /// Extracts candidate URLs from a page body
    ///
    /// URLs are returned raw (unresolved), deduplicated, in the order they
    /// first appear. A class with no matches is present with an empty list.
    pub fn extract(&self, html: &[u8]) -> ExtractedAssets {
        let assets = self
            .patterns
            .iter()
            .map(|(asset_type, pattern)| (*asset_type, extract_matches(pattern, html)))
            .collect();

        ExtractedAssets { assets }
    }
}

impl Default for AssetPatterns {
    fn default() -> Self {
        Self::new(vec![
            (AssetType::Javascript, SCRIPT_SRC.clone()),
            (AssetType::Css, LINK_HREF.clone()),
            (AssetType::Image, IMG_SRC.clone()),
        ])
    }
}

/// Links found on one page, grouped by asset class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedAssets {
    assets: Vec<(AssetType, Vec<String>)>,
}

impl ExtractedAssets {
    /// Returns the links found for one class
    pub fn get(&self, asset_type: AssetType) -> &[String] {
        self.assets
            .iter()
            .find(|(t, _)| *t == asset_type)
            .map(|(_, links)| links.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates classes in pattern order
    pub fn iter(&self) -> impl Iterator<Item = (AssetType, &[String])> {
        self.assets
            .iter()
            .map(|(asset_type, links)| (*asset_type, links.as_slice()))
    }

    /// Total number of links over all classes
    pub fn len(&self) -> usize {
        self.assets.iter().map(|(_, links)| links.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extracts links with the default Javascript, CSS and Image patterns
pub fn extract_assets(html: &[u8]) -> ExtractedAssets {
    AssetPatterns::default().extract(html)
}

/// Returns true if a raw link of this class should be downloaded
///
/// The `<link>` pattern also matches icons, preconnects, feeds and the like,
/// so a CSS candidate is kept only if its lowercase form contains `css`.
/// Every other class is always kept.
pub fn is_candidate(asset_type: AssetType, link: &str) -> bool {
    match asset_type {
        AssetType::Css => link.to_lowercase().contains("css"),
        _ => true,
    }
}

/// Runs one pattern over the body
///
/// Matches are taken from the raw bytes. If any captured URL is not valid
/// UTF-8 the body is decoded as UTF-8 (lossily) and matched again; whatever
/// that yields is the result for this class.
fn extract_matches(pattern: &Regex, html: &[u8]) -> Vec<String> {
    match collect_utf8(pattern, html) {
        Some(links) => links,
        None => {
            tracing::debug!("Non UTF-8 link in markup, retrying on decoded text");
            let decoded: Cow<'_, str> = String::from_utf8_lossy(html);
            collect_utf8(pattern, decoded.as_bytes()).unwrap_or_default()
        }
    }
}

/// Collects capture group 1 of every match, or None on a non UTF-8 capture
fn collect_utf8(pattern: &Regex, haystack: &[u8]) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for captures in pattern.captures_iter(haystack) {
        let Some(group) = captures.get(1) else {
            continue;
        };
        let link = std::str::from_utf8(group.as_bytes()).ok()?;
        if seen.insert(link) {
            links.push(link.to_string());
        }
    }

    Some(links)
}
