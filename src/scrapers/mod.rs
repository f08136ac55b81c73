//! Per-source parsing strategies.
//!
//! This module turns a fetched listing into [`ContentRecord`]s. Each source
//! shape is one [`ParsingStrategy`] variant, selected by the registry entry of
//! the source, so adding a section is a matter of registering a new
//! `(SourceSpec, ParsingStrategy)` pair.
//!
//! # Supported Shapes
//!
//! | Variant | Module | Item unit | Missing title/link |
//! |---------|--------|-----------|--------------------|
//! | `ZatazListing` | [`zataz`] | `div.blog-context-wrapper` | placeholder record |
//! | `ZatazEmbeds` | [`zataz`] | `iframe.wp-embedded-content` | placeholder record (sub-document) |
//! | `ItConnectCourses` | [`itconnect`] | `article.sfwd-courses` | item skipped |
//! | `ItConnectPosts` | [`itconnect`] | `article.post` | item skipped |
//!
//! # Common Patterns
//!
//! Strategies never touch the network. `ZatazEmbeds` only reports the
//! sub-document URLs of a listing and parses one sub-document at a time; the
//! fetching in between belongs to [`crate::resolver`].
//!
//! Extraction helpers used by every strategy live here:
//! - lazy-loaded images (`data-lazy-src` preferred over `src`)
//! - whitespace-normalized text
//! - relative links resolved against the document URL

pub mod itconnect;
pub mod zataz;

#[cfg(test)]
pub(crate) mod fixtures;

pub use itconnect::PostFields;

use crate::error::{ItemParseError, ParseError};
use crate::models::{ContentRecord, RawDocument, SourceSpec, TITLE_UNAVAILABLE, URL_UNAVAILABLE};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// The parsing variant applied to one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsingStrategy {
    /// ZATAZ category listing (security, dark web).
    ZatazListing,
    /// ZATAZ OSINT page made of WordPress embeds.
    ZatazEmbeds,
    /// IT-Connect free course catalogue.
    ItConnectCourses,
    /// IT-Connect article listing exposing the given optional fields.
    ItConnectPosts(PostFields),
}

/// What a strategy does with an item whose title/link cannot be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingIdentity {
    /// Drop the item.
    Skip,
    /// Emit it with [`TITLE_UNAVAILABLE`] and [`URL_UNAVAILABLE`].
    Placeholder,
}

impl ParsingStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ZatazListing => "zataz-listing",
            Self::ZatazEmbeds => "zataz-embeds",
            Self::ItConnectCourses => "itconnect-courses",
            Self::ItConnectPosts(_) => "itconnect-posts",
        }
    }

    pub fn missing_identity(&self) -> MissingIdentity {
        match self {
            Self::ZatazListing | Self::ZatazEmbeds => MissingIdentity::Placeholder,
            Self::ItConnectCourses | Self::ItConnectPosts(_) => MissingIdentity::Skip,
        }
    }

    /// Extract the records of a listing document.
    ///
    /// # Errors
    ///
    /// [`ParseError::Unsupported`] for [`ParsingStrategy::ZatazEmbeds`], whose
    /// listing holds no records of its own; [`ParseError::Selector`] if a
    /// selector fails to compile.
    pub fn parse(
        &self,
        document: &RawDocument,
        spec: &SourceSpec,
    ) -> Result<Vec<ContentRecord>, ParseError> {
        match self {
            Self::ZatazListing => zataz::parse_listing(document, spec),
            Self::ItConnectCourses => itconnect::parse_courses(document, spec),
            Self::ItConnectPosts(fields) => itconnect::parse_posts(document, spec, *fields),
            Self::ZatazEmbeds => Err(ParseError::Unsupported {
                strategy: self.name(),
                operation: "direct listing parsing",
            }),
        }
    }

    /// The sub-document URLs a listing embeds, in document order.
    pub fn embed_references(&self, document: &RawDocument) -> Result<Vec<String>, ParseError> {
        match self {
            Self::ZatazEmbeds => zataz::embed_references(document),
            _ => Err(ParseError::Unsupported {
                strategy: self.name(),
                operation: "embed references",
            }),
        }
    }

    /// Extract the single record of an embedded sub-document.
    pub fn parse_embed(
        &self,
        document: &RawDocument,
        spec: &SourceSpec,
    ) -> Result<ContentRecord, ItemParseError> {
        match self {
            Self::ZatazEmbeds => zataz::parse_embed(document, spec),
            _ => Err(ParseError::Unsupported {
                strategy: self.name(),
                operation: "embedded documents",
            }
            .into()),
        }
    }
}

/// Compile a CSS selector.
pub(crate) fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::selector(css, e))
}

/// The document URL, used to resolve relative links.
pub(crate) fn base_url(document: &RawDocument) -> Option<Url> {
    Url::parse(&document.url).ok()
}

/// Resolve `href` against `base`, keeping it verbatim when that is not possible.
pub(crate) fn resolve_href(base: Option<&Url>, href: &str) -> String {
    let href = href.trim();
    match base.map(|b| b.join(href)) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => href.to_string(),
    }
}

/// Trimmed text of an element with whitespace runs collapsed.
pub(crate) fn clean_text(element: ElementRef<'_>) -> String {
    let text = element.text().collect::<String>();
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Text of the first match of `sel` under `scope`.
pub(crate) fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope.select(sel).next().map(clean_text)
}

/// Non-empty texts of every match of `sel` under `scope`.
pub(crate) fn all_texts(scope: ElementRef<'_>, sel: &Selector) -> Vec<String> {
    scope
        .select(sel)
        .map(clean_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Title and link of the first `sel` match, if it carries an `href`.
///
/// An anchor without text (an image link, say) keeps its link and gets
/// [`TITLE_UNAVAILABLE`] as title.
pub(crate) fn heading_link(
    scope: ElementRef<'_>,
    sel: &Selector,
    base: Option<&Url>,
) -> Option<(String, String)> {
    let anchor = scope.select(sel).next()?;
    let href = anchor.value().attr("href").filter(|h| !h.trim().is_empty())?;
    let title = Some(clean_text(anchor))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| TITLE_UNAVAILABLE.to_string());
    Some((title, resolve_href(base, href)))
}

/// Apply `policy` to the result of [`heading_link`].
pub(crate) fn identity(
    scope: ElementRef<'_>,
    sel: &Selector,
    base: Option<&Url>,
    policy: MissingIdentity,
) -> Option<(String, String)> {
    match (heading_link(scope, sel, base), policy) {
        (Some(pair), _) => Some(pair),
        (None, MissingIdentity::Placeholder) => {
            Some((TITLE_UNAVAILABLE.to_string(), URL_UNAVAILABLE.to_string()))
        }
        (None, MissingIdentity::Skip) => None,
    }
}

/// Image URL and alt text of the first `img` matched by `sel`.
///
/// A lazy-load `data-lazy-src` wins over the eager `src`.
pub(crate) fn image(
    scope: ElementRef<'_>,
    sel: &Selector,
    base: Option<&Url>,
) -> (Option<String>, Option<String>) {
    let Some(img) = scope.select(sel).next() else {
        return (None, None);
    };
    let img = img.value();
    let src = img
        .attr("data-lazy-src")
        .or_else(|| img.attr("src"))
        .filter(|s| !s.trim().is_empty())
        .map(|s| resolve_href(base, s));
    let alt = img.attr("alt").map(|a| a.trim().to_string());
    (src, alt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn root(html: &Html) -> ElementRef<'_> {
        html.root_element()
    }

    #[test]
    fn test_lazy_image_preferred() {
        let html = Html::parse_fragment(
            r#"<div><img src="data:image/gif;base64,R0lG" data-lazy-src="/img/cover.png" alt=" Couverture "></div>"#,
        );
        let base = Url::parse("https://www.it-connect.fr/actualites/").ok();
        let (url, alt) = image(root(&html), &selector("img").unwrap(), base.as_ref());
        assert_eq!(url.as_deref(), Some("https://www.it-connect.fr/img/cover.png"));
        assert_eq!(alt.as_deref(), Some("Couverture"));
    }

    #[test]
    fn test_eager_image_and_missing_image() {
        let html = Html::parse_fragment(r#"<div><img src="https://cdn.example.com/a.jpg"></div>"#);
        let (url, alt) = image(root(&html), &selector("img").unwrap(), None);
        assert_eq!(url.as_deref(), Some("https://cdn.example.com/a.jpg"));
        assert_eq!(alt, None);

        let empty = Html::parse_fragment("<div></div>");
        assert_eq!(image(root(&empty), &selector("img").unwrap(), None), (None, None));
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        let html = Html::parse_fragment("<p>\n   Une   fuite\n de <b>données</b>  </p>");
        let text = first_text(root(&html), &selector("p").unwrap());
        assert_eq!(text.as_deref(), Some("Une fuite de données"));
    }

    #[test]
    fn test_identity_policies() {
        let html = Html::parse_fragment(r#"<h2><a>Sans lien</a></h2>"#);
        let sel = selector("h2 a").unwrap();

        assert_eq!(identity(root(&html), &sel, None, MissingIdentity::Skip), None);
        assert_eq!(
            identity(root(&html), &sel, None, MissingIdentity::Placeholder),
            Some(("Titre non disponible".to_string(), "#".to_string()))
        );
    }

    #[test]
    fn test_textless_link_keeps_url() {
        let html = Html::parse_fragment(r#"<h2><a href="/vraie-url/"><img src="x.png"></a></h2>"#);
        let sel = selector("h2 a").unwrap();
        let base = Url::parse("https://www.zataz.com/").ok();
        let expected = Some((
            "Titre non disponible".to_string(),
            "https://www.zataz.com/vraie-url/".to_string(),
        ));

        for policy in [MissingIdentity::Skip, MissingIdentity::Placeholder] {
            assert_eq!(identity(root(&html), &sel, base.as_ref(), policy), expected);
        }
    }

    #[test]
    fn test_resolve_href() {
        let base = Url::parse("https://www.zataz.com/osint/").ok();
        assert_eq!(
            resolve_href(base.as_ref(), "/article/embed/"),
            "https://www.zataz.com/article/embed/"
        );
        assert_eq!(
            resolve_href(base.as_ref(), "https://other.example/x"),
            "https://other.example/x"
        );
        assert_eq!(resolve_href(None, " relative "), "relative");
    }

    #[test]
    fn test_invalid_selector_is_parse_error() {
        assert!(matches!(selector("div[["), Err(ParseError::Selector { .. })));
    }

    #[test]
    fn test_strategy_capabilities() {
        let doc = RawDocument::html("https://www.zataz.com/osint/", "<html></html>");
        let spec = crate::registry::find("zataz-osint").unwrap();

        assert!(matches!(
            ParsingStrategy::ZatazEmbeds.parse(&doc, spec),
            Err(ParseError::Unsupported { .. })
        ));
        assert!(matches!(
            ParsingStrategy::ZatazListing.embed_references(&doc),
            Err(ParseError::Unsupported { .. })
        ));
        assert_eq!(
            ParsingStrategy::ItConnectCourses.missing_identity(),
            MissingIdentity::Skip
        );
        assert_eq!(
            ParsingStrategy::ZatazListing.missing_identity(),
            MissingIdentity::Placeholder
        );
    }
}
