//! Asset classification for downloaded resources

use serde::Serialize;
use std::fmt;

/// The class a resource was discovered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AssetType {
    /// An HTML page; the traversal root is always one
    #[serde(rename = "HTML")]
    Html,

    /// A `<script src>` reference
    Javascript,

    /// A `<link href>` reference that looks like a stylesheet
    #[serde(rename = "CSS")]
    Css,

    /// An `<img src>` reference
    Image,
}

impl AssetType {
    /// Returns the display name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Javascript => "Javascript",
            Self::Css => "CSS",
            Self::Image => "Image",
        }
    }

    /// Returns true if resources of this type are scanned for further links
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Html)
    }

    /// Returns all asset types
    pub fn all() -> [Self; 4] {
        [Self::Html, Self::Javascript, Self::Css, Self::Image]
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of traversal work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// The class this URL was discovered under
    pub asset_type: AssetType,

    /// The URL to download
    pub url: String,
}

impl WorkItem {
    pub fn new(asset_type: AssetType, url: impl Into<String>) -> Self {
        Self {
            asset_type,
            url: url.into(),
        }
    }
}
