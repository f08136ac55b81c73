//! Data models shared by the fetch, parse and aggregation stages.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ContentRecord`]: One normalized item (article, course, deal) extracted from a listing
//! - [`SourceSpec`]: Static descriptor of one scraped section
//! - [`RawDocument`]: The unparsed response body of one fetch
//!
//! The serialized field names use camelCase to match the JSON consumed by the
//! report renderer.

use crate::scrapers::ParsingStrategy;
use serde::Serialize;
use std::borrow::Cow;

/// Title used when an item's heading link cannot be found.
pub const TITLE_UNAVAILABLE: &str = "Titre non disponible";
/// Link used when an item's heading link cannot be found.
pub const URL_UNAVAILABLE: &str = "#";
/// Body used by sources whose excerpt container is missing.
pub const CONTENT_UNAVAILABLE: &str = "Contenu non disponible";
/// Comment count shown when a post exposes no comment link.
pub const NO_COMMENTS: &str = "0 commentaire";
/// Subcategory used when a post has no category label.
pub const UNCATEGORIZED: &str = "Non catégorisé";

/// A single normalized item extracted from a source listing.
///
/// `title`, `url` and `category` are always populated, falling back to
/// [`TITLE_UNAVAILABLE`] / [`URL_UNAVAILABLE`] when the markup does not expose
/// them. Display fields such as `published_at` are kept as the opaque strings
/// the site renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// The item headline.
    pub title: String,
    /// Absolute link to the item, or `"#"`.
    pub url: String,
    /// Full content for some sources, a short excerpt for others.
    pub body: String,
    /// Primary bucket, fixed per source.
    pub category: String,
    /// Secondary classification, only for sources that expose one.
    pub subcategory: Option<String>,
    /// Tag or category labels in document order; empty when the source has none.
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub published_at: Option<String>,
    pub author: Option<String>,
    pub comment_count: Option<String>,
}

impl ContentRecord {
    /// Create a record carrying only the mandatory fields.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        body: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            body: body.into(),
            category: category.into(),
            subcategory: None,
            tags: Vec::new(),
            image_url: None,
            image_alt: None,
            published_at: None,
            author: None,
            comment_count: None,
        }
    }

    /// Whether the record carries the placeholder identity pair.
    pub fn is_placeholder(&self) -> bool {
        self.title == TITLE_UNAVAILABLE && self.url == URL_UNAVAILABLE
    }
}

/// Static descriptor of one scraped section.
///
/// The registry of these is defined at compile time and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// Stable identifier, e.g. `"zataz-osint"`.
    pub id: &'static str,
    /// Site the section belongs to (the report groups its tabs by site).
    pub site: &'static str,
    pub listing_url: &'static str,
    /// Value written to every record's `category`.
    pub category_label: &'static str,
    pub strategy: ParsingStrategy,
    /// Whether the listing only references embedded sub-documents.
    pub requires_indirect_fetch: bool,
    /// Request headers replacing the default browser identity for this source.
    pub headers: Option<&'static [(&'static str, &'static str)]>,
}

/// The body and metadata of one successful fetch.
///
/// Consumed once by a parsing strategy and dropped afterwards.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// The URL that was requested.
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
}

impl RawDocument {
    /// Convenience constructor for a `200 OK` HTML document.
    #[cfg(test)]
    pub fn html(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: 200,
            body: body.into().into_bytes(),
            headers: vec![("content-type".to_string(), "text/html; charset=UTF-8".to_string())],
        }
    }

    /// First value of a response header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
