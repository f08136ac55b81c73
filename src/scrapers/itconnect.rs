//! IT-Connect scrapers.
//!
//! [IT-Connect](https://www.it-connect.fr) renders every section with the same
//! WordPress theme: items are `article` elements with an `h2.cm-entry-title`
//! heading link, a featured image and optional meta spans. Sections differ
//! only in which of those meta fields they show, which [`PostFields`] selects.
//!
//! Items without a heading link are skipped.

use super::{all_texts, base_url, first_text, identity, image, selector};
use crate::error::ParseError;
use crate::models::{ContentRecord, NO_COMMENTS, RawDocument, SourceSpec, UNCATEGORIZED};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

/// Optional meta fields exposed by one IT-Connect section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostFields {
    /// `span.cm-post-date time`
    pub date: bool,
    /// `span.cm-author a`
    pub author: bool,
    /// `span.cm-comments-link a`, defaulting to "0 commentaire"
    pub comments: bool,
    /// Links of the first `span.cm-tag-links`
    pub tags: bool,
    /// First `div.cm-post-categories a`, defaulting to "Non catégorisé"
    pub subcategory: bool,
    /// Every `div.cm-post-categories a`, appended to the tags
    pub category_tags: bool,
}

impl PostFields {
    /// Title, link, image and excerpt only.
    pub const BASIC: Self = Self {
        date: false,
        author: false,
        comments: false,
        tags: false,
        subcategory: false,
        category_tags: false,
    };

    /// Date and author, shown by every news section.
    pub const NEWS: Self = Self {
        date: true,
        author: true,
        ..Self::BASIC
    };
}

/// Selectors shared by courses and posts.
struct Common {
    title: Selector,
    image: Selector,
}

impl Common {
    fn compile() -> Result<Self, ParseError> {
        Ok(Self {
            title: selector("h2.cm-entry-title a")?,
            image: selector("div.cm-featured-image img")?,
        })
    }
}

struct Meta {
    summary: Selector,
    date: Selector,
    author: Selector,
    comments: Selector,
    tag_links: Selector,
    link: Selector,
    categories: Selector,
}

impl Meta {
    fn compile() -> Result<Self, ParseError> {
        Ok(Self {
            summary: selector("div.cm-entry-summary p")?,
            date: selector("span.cm-post-date time")?,
            author: selector("span.cm-author a")?,
            comments: selector("span.cm-comments-link a")?,
            tag_links: selector("span.cm-tag-links")?,
            link: selector("a")?,
            categories: selector("div.cm-post-categories a")?,
        })
    }
}

/// Parse the free course catalogue; the record body is the chapter count.
#[instrument(level = "info", skip_all, fields(source = spec.id))]
pub fn parse_courses(
    document: &RawDocument,
    spec: &SourceSpec,
) -> Result<Vec<ContentRecord>, ParseError> {
    let item_selector = selector("article.sfwd-courses")?;
    let chapters_selector = selector("div.course-informations__steps-count")?;
    let common = Common::compile()?;

    let html = Html::parse_document(&document.text());
    let base = base_url(document);

    let mut records = Vec::new();
    for (index, item) in html.select(&item_selector).enumerate() {
        let policy = spec.strategy.missing_identity();
        let Some((title, url)) = identity(item, &common.title, base.as_ref(), policy) else {
            debug!(index, "Skipping course without title link");
            continue;
        };

        let chapters = first_text(item, &chapters_selector).unwrap_or_default();
        let mut record = ContentRecord::new(title, url, chapters, spec.category_label);
        (record.image_url, record.image_alt) = image(item, &common.image, base.as_ref());
        records.push(record);
    }

    info!(count = records.len(), "Parsed IT-Connect courses");
    Ok(records)
}

/// Parse an article listing, extracting the meta fields `fields` enables.
#[instrument(level = "info", skip_all, fields(source = spec.id))]
pub fn parse_posts(
    document: &RawDocument,
    spec: &SourceSpec,
    fields: PostFields,
) -> Result<Vec<ContentRecord>, ParseError> {
    let item_selector = selector("article.post")?;
    let common = Common::compile()?;
    let meta = Meta::compile()?;

    let html = Html::parse_document(&document.text());
    let base = base_url(document);

    let mut records = Vec::new();
    for (index, item) in html.select(&item_selector).enumerate() {
        let policy = spec.strategy.missing_identity();
        let Some((title, url)) = identity(item, &common.title, base.as_ref(), policy) else {
            debug!(index, "Skipping post without title link");
            continue;
        };

        let summary = first_text(item, &meta.summary).unwrap_or_default();
        let mut record = ContentRecord::new(title, url, summary, spec.category_label);
        (record.image_url, record.image_alt) = image(item, &common.image, base.as_ref());
        apply_meta(&mut record, item, &meta, fields);
        records.push(record);
    }

    info!(count = records.len(), "Parsed IT-Connect posts");
    Ok(records)
}

fn apply_meta(record: &mut ContentRecord, item: ElementRef<'_>, meta: &Meta, fields: PostFields) {
    if fields.date {
        record.published_at = Some(first_text(item, &meta.date).unwrap_or_default());
    }
    if fields.author {
        record.author = Some(first_text(item, &meta.author).unwrap_or_default());
    }
    if fields.comments {
        record.comment_count = Some(
            first_text(item, &meta.comments)
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| NO_COMMENTS.to_string()),
        );
    }
    if fields.tags {
        if let Some(tag_links) = item.select(&meta.tag_links).next() {
            record.tags.extend(all_texts(tag_links, &meta.link));
        }
    }
    if fields.subcategory {
        record.subcategory = Some(
            first_text(item, &meta.categories)
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        );
    }
    if fields.category_tags {
        record.tags.extend(all_texts(item, &meta.categories));
    }
}
