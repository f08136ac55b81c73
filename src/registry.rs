//! The static table of scraped sections.
//!
//! Order matters: the aggregated output concatenates sources in the order
//! they appear in [`REGISTRY`].

use crate::models::SourceSpec;
use crate::scrapers::{ParsingStrategy, PostFields};

/// Reduced browser identity used by the hardware news section.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "fr,fr-FR;q=0.8,en-US;q=0.5,en;q=0.3"),
    ("Connection", "keep-alive"),
];

const ZATAZ: &str = "ZATAZ";
const IT_CONNECT: &str = "IT-Connect";

const fn itconnect(
    id: &'static str,
    listing_url: &'static str,
    category_label: &'static str,
    fields: PostFields,
) -> SourceSpec {
    SourceSpec {
        id,
        site: IT_CONNECT,
        listing_url,
        category_label,
        strategy: ParsingStrategy::ItConnectPosts(fields),
        requires_indirect_fetch: false,
        headers: None,
    }
}

pub const REGISTRY: &[SourceSpec] = &[
    SourceSpec {
        id: "zataz-cybersecurity",
        site: ZATAZ,
        listing_url: "https://www.zataz.com/category/secu/",
        category_label: "cybersecurity",
        strategy: ParsingStrategy::ZatazListing,
        requires_indirect_fetch: false,
        headers: None,
    },
    SourceSpec {
        id: "zataz-darkweb",
        site: ZATAZ,
        listing_url: "https://www.zataz.com/category/actualites/internet-clandestin-darknet/",
        category_label: "darkweb",
        strategy: ParsingStrategy::ZatazListing,
        requires_indirect_fetch: false,
        headers: None,
    },
    SourceSpec {
        id: "zataz-osint",
        site: ZATAZ,
        listing_url: "https://www.zataz.com/osint/",
        category_label: "osint",
        strategy: ParsingStrategy::ZatazEmbeds,
        requires_indirect_fetch: true,
        headers: None,
    },
    SourceSpec {
        id: "itconnect-courses",
        site: IT_CONNECT,
        listing_url: "https://www.it-connect.fr/cours-it-gratuits/",
        category_label: "courses",
        strategy: ParsingStrategy::ItConnectCourses,
        requires_indirect_fetch: false,
        headers: None,
    },
    itconnect(
        "itconnect-sysadmin",
        "https://www.it-connect.fr/cours-tutoriels/administration-systemes/",
        "sysadmin",
        PostFields::BASIC,
    ),
    itconnect(
        "itconnect-netadmin",
        "https://www.it-connect.fr/cours-tutoriels/administration-reseau/",
        "netadmin",
        PostFields {
            subcategory: true,
            ..PostFields::BASIC
        },
    ),
    itconnect(
        "itconnect-cybersec",
        "https://www.it-connect.fr/cours-tutoriels/securite-informatique/",
        "cybersec",
        PostFields {
            tags: true,
            ..PostFields::BASIC
        },
    ),
    itconnect(
        "itconnect-cybernews",
        "https://www.it-connect.fr/actualites/actu-securite/",
        "cybernews",
        PostFields::NEWS,
    ),
    itconnect(
        "itconnect-webnews",
        "https://www.it-connect.fr/actualites/actu-internet/",
        "webnews",
        PostFields {
            comments: true,
            ..PostFields::NEWS
        },
    ),
    itconnect(
        "itconnect-osnews",
        "https://www.it-connect.fr/actualites/actu-logiciel-os/",
        "osnews",
        PostFields {
            tags: true,
            ..PostFields::NEWS
        },
    ),
    SourceSpec {
        headers: Some(BROWSER_HEADERS),
        ..itconnect(
            "itconnect-hardnews",
            "https://www.it-connect.fr/actualites/actu-materiel/",
            "hardnews",
            PostFields {
                comments: true,
                tags: true,
                ..PostFields::NEWS
            },
        )
    },
    itconnect(
        "itconnect-mobilenews",
        "https://www.it-connect.fr/actualites/actu-mobile/",
        "mobilenews",
        PostFields {
            comments: true,
            category_tags: true,
            ..PostFields::NEWS
        },
    ),
    itconnect(
        "itconnect-deals",
        "https://www.it-connect.fr/bons-plans-high-tech/",
        "deals",
        PostFields {
            comments: true,
            tags: true,
            ..PostFields::NEWS
        },
    ),
];

/// Look up a source by id.
pub fn find(id: &str) -> Option<&'static SourceSpec> {
    REGISTRY.iter().find(|spec| spec.id == id)
}

/// The registry entries named by `ids`, in registry order; all of them when `ids` is empty.
///
/// # Errors
///
/// Returns the first id that matches no source.
pub fn select(ids: &[String]) -> Result<Vec<SourceSpec>, String> {
    if let Some(unknown) = ids.iter().find(|id| find(id).is_none()) {
        return Err(unknown.clone());
    }
    Ok(REGISTRY
        .iter()
        .filter(|spec| ids.is_empty() || ids.iter().any(|id| id == spec.id))
        .cloned()
        .collect())
}
