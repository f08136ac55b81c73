//! Two-stage resolution of listings that only embed their articles.
//!
//! The listing is scanned for embed references, then every referenced
//! sub-document is fetched and parsed on its own, strictly one after another.
//! A reference that fails to fetch or parse is logged and dropped; the
//! records already resolved are kept.

use crate::error::{ItemParseError, ParseError};
use crate::fetch::{Delay, FetchPolicy, Fetcher, Transport};
use crate::models::{ContentRecord, RawDocument, SourceSpec};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

/// Resolves the embeds of one listing through a [`Fetcher`].
pub struct IndirectResolver<'a, T, D> {
    fetcher: &'a Fetcher<T, D>,
    policy: &'a FetchPolicy,
}

impl<'a, T, D> IndirectResolver<'a, T, D>
where
    T: Transport,
    D: Delay,
{
    pub fn new(fetcher: &'a Fetcher<T, D>, policy: &'a FetchPolicy) -> Self {
        Self { fetcher, policy }
    }

    /// One record per successfully resolved embed, in encounter order.
    ///
    /// # Errors
    ///
    /// Only when the listing itself cannot be scanned for references.
    #[instrument(level = "info", skip_all, fields(source = spec.id))]
    pub async fn resolve(
        &self,
        listing: &RawDocument,
        spec: &SourceSpec,
    ) -> Result<Vec<ContentRecord>, ParseError> {
        let references = spec.strategy.embed_references(listing)?;
        let total = references.len();

        let records: Vec<ContentRecord> = stream::iter(references.into_iter().enumerate())
            .then(|(index, reference)| async move {
                match self.resolve_one(&reference, spec).await {
                    Ok(record) => {
                        debug!(index, %reference, "Resolved embed");
                        Some(record)
                    }
                    Err(e) => {
                        warn!(index, %reference, error = %e, "Embed resolution failed; skipping");
                        None
                    }
                }
            })
            .filter_map(std::future::ready)
            .collect()
            .await;

        info!(total, resolved = records.len(), "Resolved embedded articles");
        Ok(records)
    }

    async fn resolve_one(
        &self,
        reference: &str,
        spec: &SourceSpec,
    ) -> Result<ContentRecord, ItemParseError> {
        let document = self.fetcher.fetch(reference, self.policy).await?;
        spec.strategy.parse_embed(&document, spec)
    }
}
