//! Runs every registered source and merges their records.
//!
//! Sources are processed one after another. A source whose listing cannot be
//! fetched, or whose document cannot be parsed, contributes zero records and
//! the run carries on; the run itself never fails.

use crate::fetch::{Delay, FetchPolicy, Fetcher, Transport};
use crate::models::{ContentRecord, SourceSpec};
use crate::resolver::IndirectResolver;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// What one source contributed to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub id: &'static str,
    pub category: &'static str,
    pub count: usize,
    /// Why the source contributed nothing, if it failed.
    pub failure: Option<String>,
}

/// Result of a full run.
#[derive(Debug, Default, Clone)]
pub struct RunOutcome {
    /// Per-source records concatenated in registry order.
    pub records: Vec<ContentRecord>,
    pub sources: Vec<SourceSummary>,
}

impl RunOutcome {
    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.failure.is_some()).count()
    }
}

/// Drives the fetch and parse cycle over a list of sources.
pub struct Aggregator<'a, T, D> {
    fetcher: &'a Fetcher<T, D>,
    policy: FetchPolicy,
    sources: &'a [SourceSpec],
}

impl<'a, T, D> Aggregator<'a, T, D>
where
    T: Transport,
    D: Delay,
{
    /// Build an aggregator over `sources`.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Shared by every listing and sub-document fetch of the run.
    /// * `policy` - Base fetch policy; sources with custom headers override them.
    /// * `sources` - Processed, and concatenated, in this order.
    pub fn new(fetcher: &'a Fetcher<T, D>, policy: FetchPolicy, sources: &'a [SourceSpec]) -> Self {
        Self {
            fetcher,
            policy,
            sources,
        }
    }

    /// Process every source in order.
    ///
    /// Each source is fetched with the shared policy, overridden by its own
    /// headers when it has any, then parsed directly or through the
    /// [`IndirectResolver`]. A failing source is logged and recorded in its
    /// [`SourceSummary`]; the remaining sources still run.
    ///
    /// # Returns
    ///
    /// A [`RunOutcome`] whose records are the per-source records concatenated
    /// in source order, with one summary per source.
    #[instrument(level = "info", skip_all, fields(sources = self.sources.len()))]
    pub async fn run(&self) -> RunOutcome {
        let t0 = Instant::now();
        let mut outcome = RunOutcome::default();

        for spec in self.sources {
            let (records, failure) = match self.collect(spec).await {
                Ok(records) => (records, None),
                Err(reason) => (Vec::new(), Some(reason)),
            };

            info!(
                source = spec.id,
                site = spec.site,
                count = records.len(),
                placeholders = records.iter().filter(|r| r.is_placeholder()).count(),
                "Source done"
            );
            outcome.sources.push(SourceSummary {
                id: spec.id,
                category: spec.category_label,
                count: records.len(),
                failure,
            });
            outcome.records.extend(records);
        }

        info!(
            total = outcome.records.len(),
            failed_sources = outcome.failed_sources(),
            elapsed_ms = t0.elapsed().as_millis(),
            "Aggregation complete"
        );
        outcome
    }

    /// Records of one source, or the reason it produced none.
    async fn collect(&self, spec: &SourceSpec) -> Result<Vec<ContentRecord>, String> {
        let policy = self.policy.for_source(spec);

        let listing = match self.fetcher.fetch(spec.listing_url, &policy).await {
            Ok(listing) => listing,
            Err(e) => {
                error!(source = spec.id, url = spec.listing_url, error = %e, cause = %e.last_cause(), "Source unavailable");
                return Err(format!("{e}: {}", e.last_cause()));
            }
        };

        let parsed = if spec.requires_indirect_fetch {
            IndirectResolver::new(self.fetcher, &policy)
                .resolve(&listing, spec)
                .await
        } else {
            spec.strategy.parse(&listing, spec)
        };

        parsed.map_err(|e| {
            warn!(source = spec.id, error = %e, "Parsing failed; dropping source");
            e.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{StubTransport, stub_fetcher};
    use crate::models::RawDocument;
    use crate::registry;
    use crate::scrapers::{ParsingStrategy, PostFields, fixtures};

    const A_URL: &str = "https://www.it-connect.fr/a/";
    const B_URL: &str = "https://www.zataz.com/b/";

    fn strict_source() -> SourceSpec {
        SourceSpec {
            id: "a",
            site: "IT-Connect",
            listing_url: A_URL,
            category_label: "sysadmin",
            strategy: ParsingStrategy::ItConnectPosts(PostFields::BASIC),
            requires_indirect_fetch: false,
            headers: None,
        }
    }

    fn tolerant_source() -> SourceSpec {
        SourceSpec {
            id: "b",
            site: "ZATAZ",
            listing_url: B_URL,
            category_label: "darkweb",
            strategy: ParsingStrategy::ZatazListing,
            requires_indirect_fetch: false,
            headers: None,
        }
    }

    fn policy() -> FetchPolicy {
        FetchPolicy {
            max_attempts: 2,
            ..FetchPolicy::default()
        }
    }

    fn two_sources_transport() -> StubTransport {
        StubTransport::new()
            .page(A_URL, fixtures::ITCONNECT_POSTS)
            .page(B_URL, fixtures::ZATAZ_LISTING)
    }

    #[tokio::test]
    async fn test_end_to_end_registry_order() {
        let fetcher = stub_fetcher(two_sources_transport());
        let sources = vec![strict_source(), tolerant_source()];

        let outcome = Aggregator::new(&fetcher, policy(), &sources).run().await;

        assert_eq!(outcome.records.len(), 4);
        let categories: Vec<_> = outcome.records.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["sysadmin", "sysadmin", "darkweb", "darkweb"]);
        assert_eq!(outcome.records[0].title, "Patch Tuesday : 60 failles corrigées");
        assert_eq!(outcome.records[2].title, "Un forum pirate saisi");
        assert_eq!(outcome.records[3].title, "Titre non disponible");
        assert_eq!(outcome.records[3].url, "#");
        assert_eq!(outcome.failed_sources(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_source_contributes_nothing() {
        let transport = StubTransport::new()
            .status(A_URL, 503)
            .page(B_URL, fixtures::ZATAZ_LISTING);
        let fetcher = stub_fetcher(transport);
        let sources = vec![strict_source(), tolerant_source()];

        let outcome = Aggregator::new(&fetcher, policy(), &sources).run().await;

        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.records.iter().all(|r| r.category == "darkweb"));
        assert_eq!(fetcher.transport().calls_to(A_URL), 2);

        assert_eq!(outcome.sources[0].count, 0);
        let failure = outcome.sources[0].failure.as_deref().unwrap();
        assert!(failure.contains("HTTP 503"), "{failure}");
        assert_eq!(outcome.sources[1].failure, None);
    }

    #[tokio::test]
    async fn test_every_source_failing_yields_empty_collection() {
        let fetcher = stub_fetcher(StubTransport::new());
        let sources = registry::select(&[]).unwrap();

        let outcome = Aggregator::new(&fetcher, policy(), &sources).run().await;

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.sources.len(), sources.len());
        assert_eq!(outcome.failed_sources(), sources.len());
        assert_eq!(fetcher.transport().calls().len(), sources.len() * 2);
    }

    #[tokio::test]
    async fn test_misconfigured_source_is_isolated() {
        let broken = SourceSpec {
            id: "broken",
            strategy: ParsingStrategy::ZatazEmbeds,
            requires_indirect_fetch: false,
            ..tolerant_source()
        };
        let fetcher = stub_fetcher(two_sources_transport());
        let sources = vec![broken, strict_source()];

        let outcome = Aggregator::new(&fetcher, policy(), &sources).run().await;

        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.sources[0].failure.is_some());
    }

    #[tokio::test]
    async fn test_indirect_source() {
        let listing = "https://www.zataz.com/osint/";
        let transport = StubTransport::new()
            .page(listing, fixtures::ZATAZ_OSINT)
            .page(
                "https://www.zataz.com/osint-premier/embed/",
                &fixtures::zataz_embed("osint-premier", "Premier"),
            )
            .page(
                "https://www.zataz.com/osint-troisieme/embed/",
                &fixtures::zataz_embed("osint-troisieme", "Troisième"),
            );
        let fetcher = stub_fetcher(transport);
        let sources = registry::select(&["zataz-osint".to_string()]).unwrap();

        let outcome = Aggregator::new(&fetcher, policy(), &sources).run().await;

        let titles: Vec<_> = outcome.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Premier", "Troisième"]);
        assert!(outcome.records.iter().all(|r| r.category == "osint"));
        assert_eq!(outcome.sources[0].failure, None);
    }

    #[tokio::test]
    async fn test_source_headers_reach_transport() {
        let ids = ["itconnect-sysadmin".to_string(), "itconnect-hardnews".to_string()];
        let sources = registry::select(&ids).unwrap();
        let mut transport = StubTransport::new();
        for spec in &sources {
            transport = transport.page(spec.listing_url, fixtures::ITCONNECT_POSTS);
        }
        let fetcher = stub_fetcher(transport);
        let insecure = FetchPolicy {
            verify_tls: false,
            ..policy()
        };

        let outcome = Aggregator::new(&fetcher, insecure, &sources).run().await;
        assert_eq!(outcome.records.len(), 4);

        let calls = fetcher.transport().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].header("Cache-Control"), Some("no-cache"));
        assert_eq!(calls[1].url, sources[1].listing_url);
        assert_eq!(calls[1].header("Cache-Control"), None);
        assert_eq!(calls[1].header("Pragma"), None);
        assert_eq!(calls[1].header("Connection"), Some("keep-alive"));
        assert!(calls.iter().all(|c| !c.verify_tls));
    }

    #[tokio::test]
    async fn test_rerun_is_identical() {
        let sources = vec![strict_source(), tolerant_source()];

        let first = {
            let fetcher = stub_fetcher(two_sources_transport());
            Aggregator::new(&fetcher, policy(), &sources).run().await
        };
        let second = {
            let fetcher = stub_fetcher(two_sources_transport());
            Aggregator::new(&fetcher, policy(), &sources).run().await
        };

        assert_eq!(first.records, second.records);
        assert_eq!(first.sources, second.sources);
    }

    #[test]
    fn test_parse_is_pure() {
        let spec = tolerant_source();
        let doc = RawDocument::html(B_URL, fixtures::ZATAZ_LISTING);
        assert_eq!(
            spec.strategy.parse(&doc, &spec).unwrap(),
            spec.strategy.parse(&doc, &spec).unwrap()
        );
    }
}
