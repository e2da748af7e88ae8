//! Content record types read from the site's `_data/*.json` files.

use serde::{Deserialize, Serialize};

/// Link target used when a record has no URL.
pub const PLACEHOLDER_URL: &str = "#";

/// Treat empty strings as absent, so `Some("")` never wins a fallback chain.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// FetchedMetadata
// ---------------------------------------------------------------------------

/// Page-level metadata scraped from a record's URL. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

impl FetchedMetadata {
    /// `true` when no field was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.site_name.is_none()
    }
}

// ---------------------------------------------------------------------------
// Find
// ---------------------------------------------------------------------------

/// A bookmarked link, video, article or quote shown on the home page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Find {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Free-form commentary; doubles as the description.
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// `link`, `video`, `article`, `quote`, ...
    #[serde(default = "default_category")]
    pub category: String,
    /// `small`, `medium` or `large`.
    #[serde(default = "default_size")]
    pub size: String,
    /// Quote text, for `category = "quote"`.
    #[serde(default)]
    pub quote: Option<String>,
    /// Quote attribution.
    #[serde(default)]
    pub author: Option<String>,
}

fn default_category() -> String {
    "link".into()
}
fn default_size() -> String {
    "small".into()
}

// ---------------------------------------------------------------------------
// Publication
// ---------------------------------------------------------------------------

/// Publication year as written in the data file: `2024` or `"2024"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A paper, thesis or talk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub year: Option<Year>,
    /// `journal`, `conference`, `thesis`, `preprint`, `workshop`.
    #[serde(rename = "type", default = "default_publication_kind")]
    pub kind: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

fn default_publication_kind() -> String {
    "journal".into()
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A software or research project. Projects are never enriched from the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "default_project_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `active` or anything else (rendered as completed).
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

fn default_project_title() -> String {
    "Untitled Project".into()
}
fn default_status() -> String {
    "active".into()
}

// ---------------------------------------------------------------------------
// WritingEntry
// ---------------------------------------------------------------------------

/// A writing listed in `writing.json`; the page itself is hosted elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritingEntry {
    #[serde(default = "default_writing_title")]
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// Usually ISO `YYYY-MM-DD`; sorted as a raw string.
    #[serde(default)]
    pub date: String,
}

fn default_writing_title() -> String {
    "Untitled".into()
}
