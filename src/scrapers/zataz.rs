//! ZATAZ scrapers.
//!
//! Two shapes are served by [ZATAZ](https://www.zataz.com):
//!
//! - Category listings (security, dark web): each item is a
//!   `div.blog-context-wrapper` holding the heading and the full post body.
//!   A missing heading still yields a record, since the body is the content.
//! - The OSINT page: items are WordPress `iframe.wp-embedded-content` embeds.
//!   The iframe `src` points at the `/embed/` rendition of the article, which
//!   has to be fetched separately and parsed with [`parse_embed`].

use super::{base_url, clean_text, first_text, identity, resolve_href, selector};
use crate::error::{ItemParseError, ParseError};
use crate::models::{CONTENT_UNAVAILABLE, ContentRecord, RawDocument, SourceSpec};
use scraper::Html;
use tracing::{debug, info, instrument};

/// Marker segment of the embed rendition of a WordPress post.
const EMBED_SEGMENT: &str = "/embed/";
const EMBED_CONTAINER: &str = r#"div[class*="wp-embed post-"]"#;

/// Parse a ZATAZ category listing.
#[instrument(level = "info", skip_all, fields(source = spec.id))]
pub fn parse_listing(
    document: &RawDocument,
    spec: &SourceSpec,
) -> Result<Vec<ContentRecord>, ParseError> {
    let item_selector = selector("div.blog-context-wrapper")?;
    let title_selector = selector("h2.blog-title a")?;
    let content_selector = selector("div.blog-content")?;

    let html = Html::parse_document(&document.text());
    let base = base_url(document);

    let mut records = Vec::new();
    for item in html.select(&item_selector) {
        let Some((title, url)) = identity(
            item,
            &title_selector,
            base.as_ref(),
            spec.strategy.missing_identity(),
        ) else {
            continue;
        };

        let body = item
            .select(&content_selector)
            .next()
            .map(clean_text)
            .unwrap_or_else(|| CONTENT_UNAVAILABLE.to_string());

        records.push(ContentRecord::new(title, url, body, spec.category_label));
    }

    info!(count = records.len(), "Parsed ZATAZ listing");
    Ok(records)
}

/// Sub-document URLs of the embeds in a listing, skipping iframes without `src`.
#[instrument(level = "info", skip_all, fields(url = %document.url))]
pub fn embed_references(document: &RawDocument) -> Result<Vec<String>, ParseError> {
    let iframe_selector = selector("iframe.wp-embedded-content")?;

    let html = Html::parse_document(&document.text());
    let base = base_url(document);

    let mut references = Vec::new();
    for iframe in html.select(&iframe_selector) {
        match iframe.value().attr("src").map(str::trim) {
            Some(src) if !src.is_empty() => references.push(resolve_href(base.as_ref(), src)),
            _ => debug!("Skipping embed without src"),
        }
    }

    info!(count = references.len(), "Found embedded articles");
    Ok(references)
}

/// Parse the embed rendition of one article.
///
/// The heading link points at the embed URL too; its `/embed/` segment is
/// removed to get the canonical article link.
///
/// # Errors
///
/// [`ItemParseError::MissingContainer`] if the page has no `wp-embed` post container.
pub fn parse_embed(
    document: &RawDocument,
    spec: &SourceSpec,
) -> Result<ContentRecord, ItemParseError> {
    let container_selector = selector(EMBED_CONTAINER)?;
    let heading_selector = selector("p.wp-embed-heading a")?;
    let excerpt_selector = selector("div.wp-embed-excerpt p")?;

    let html = Html::parse_document(&document.text());
    let base = base_url(document);

    let container = html.select(&container_selector).next().ok_or_else(|| {
        ItemParseError::MissingContainer {
            url: document.url.clone(),
            container: EMBED_CONTAINER,
        }
    })?;

    let (title, url) = identity(
        container,
        &heading_selector,
        base.as_ref(),
        spec.strategy.missing_identity(),
    )
    .unwrap_or_default();
    let url = canonical_link(&url);

    let body = first_text(container, &excerpt_selector)
        .unwrap_or_else(|| CONTENT_UNAVAILABLE.to_string());

    Ok(ContentRecord::new(title, url, body, spec.category_label))
}

/// Drop the `/embed/` segment from an embed link.
pub fn canonical_link(link: &str) -> String {
    link.replace(EMBED_SEGMENT, "/")
}
