//! Crawl orchestration: discover → scan listings → enrich details.
//!
//! Discovery failure is the only error that ends a run. A listing page
//! that cannot be fetched contributes no stubs; a detail page that cannot
//! be fetched contributes a record with empty enriched fields. Both are
//! counted in [`CrawlStats`].
//!
//! Cancelling the token stops new fetches. Fetches already in flight run to
//! completion (or time out) and the records gathered so far are returned.

use dirscout_core::{AppConfig, CrawlResult, CrawlStats, EnrichedRecord, EntityStub, SiteProfile};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::discovery::DiscoveryPlanner;
use crate::document::Document;
use crate::enrich::{DetailEnricher, EnrichOutcome};
use crate::error::{CrawlError, ScraperError};
use crate::extract::FieldExtractors;
use crate::listing::{HeadingStatus, ListingScanner};
use crate::source::DocumentSource;
use crate::throttle::Throttle;

#[derive(Debug, Clone, Copy)]
pub struct CrawlerOptions {
    pub listing_throttle: Throttle,
    pub detail_throttle: Throttle,
    /// Simultaneous detail-page fetches. `1` means strictly sequential.
    pub max_concurrent: usize,
}

impl CrawlerOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            listing_throttle: Throttle::new(config.listing_delay),
            detail_throttle: Throttle::new(config.detail_delay),
            max_concurrent: config.max_concurrent_fetches,
        }
    }

    /// No delays, one fetch at a time.
    #[must_use]
    pub fn unthrottled() -> Self {
        Self {
            listing_throttle: Throttle::disabled(),
            detail_throttle: Throttle::disabled(),
            max_concurrent: 1,
        }
    }
}

pub struct Crawler<S> {
    source: S,
    planner: DiscoveryPlanner,
    scanner: ListingScanner,
    fields: FieldExtractors,
    options: CrawlerOptions,
    cancel: CancellationToken,
}

impl<S: DocumentSource> Crawler<S> {
    /// # Errors
    ///
    /// Returns an error if the profile's URLs, selectors or patterns are
    /// invalid.
    pub fn new(
        source: S,
        profile: &SiteProfile,
        options: CrawlerOptions,
    ) -> Result<Self, ScraperError> {
        Ok(Self {
            source,
            planner: DiscoveryPlanner::from_profile(profile),
            scanner: ListingScanner::from_profile(profile)?,
            fields: FieldExtractors::compile(&profile.fields)?,
            options,
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the crawler's cancellation token with one owned by the caller.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// # Errors
    ///
    /// Returns [`CrawlError::Discovery`] if the listing pages cannot be
    /// enumerated.
    pub async fn plan(&self) -> Result<Vec<String>, CrawlError> {
        self.planner
            .plan(&self.source)
            .await
            .map_err(CrawlError::Discovery)
    }

    /// Runs the whole pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Discovery`] if discovery fails. Every other
    /// failure is absorbed and counted.
    pub async fn run(&self) -> Result<CrawlResult, CrawlError> {
        tracing::info!(planner = ?self.planner, "discovering listing pages");
        let pages = self.plan().await?;
        let mut stats = CrawlStats {
            pages_planned: pages.len(),
            ..CrawlStats::default()
        };
        tracing::info!(pages = pages.len(), "discovery complete");

        let stubs = self.scan_listings(&pages, &mut stats).await;
        stats.stubs_found = stubs.len();
        tracing::info!(
            stubs = stubs.len(),
            pages_failed = stats.pages_failed,
            "listing scan complete"
        );

        let records = self.enrich_stubs(stubs, &mut stats).await;
        stats.cancelled = self.cancel.is_cancelled();
        tracing::info!(
            records = records.len(),
            stubs_failed = stats.stubs_failed,
            stubs_skipped = stats.stubs_skipped,
            cancelled = stats.cancelled,
            "enrichment complete"
        );

        Ok(CrawlResult { records, stats })
    }

    async fn scan_listings(&self, pages: &[String], stats: &mut CrawlStats) -> Vec<EntityStub> {
        let mut stubs = Vec::new();

        for (idx, url) in pages.iter().enumerate() {
            if idx > 0 && !self.options.listing_throttle.pause(&self.cancel).await {
                break;
            }
            if self.cancel.is_cancelled() {
                break;
            }
            let ordinal = idx + 1;

            match self.source.fetch(url).await {
                Ok(body) => {
                    let scan = {
                        let doc = Document::parse(&body);
                        self.scanner.scan(&doc, ordinal)
                    };
                    match &scan.heading {
                        HeadingStatus::Labelled => {}
                        HeadingStatus::Missing => tracing::warn!(
                            url = %url,
                            ordinal,
                            category = %scan.category,
                            "listing heading missing; using placeholder category"
                        ),
                        HeadingStatus::Unlabelled(heading) => tracing::warn!(
                            url = %url,
                            ordinal,
                            heading = %heading,
                            category = %scan.category,
                            "heading markers left no category label; using placeholder"
                        ),
                    }
                    tracing::info!(
                        url = %url,
                        ordinal,
                        total = pages.len(),
                        category = %scan.category,
                        stubs = scan.stubs.len(),
                        "scanned listing page"
                    );
                    stubs.extend(scan.stubs);
                }
                Err(err) => {
                    stats.pages_failed += 1;
                    tracing::warn!(
                        url = %url,
                        ordinal,
                        error = %err,
                        "listing page failed; skipping"
                    );
                }
            }
        }

        if self.cancel.is_cancelled() {
            tracing::warn!("crawl cancelled during listing scan");
        }
        stubs
    }

    async fn enrich_stubs(
        &self,
        stubs: Vec<EntityStub>,
        stats: &mut CrawlStats,
    ) -> Vec<EnrichedRecord> {
        let cap = self.options.max_concurrent.max(1);
        let enricher = DetailEnricher::new(&self.source, &self.fields);
        let enricher = &enricher;
        let total = stubs.len();

        let mut outcomes: Vec<(usize, Option<EnrichOutcome>)> =
            stream::iter(stubs.into_iter().enumerate())
                .map(|(idx, stub)| async move {
                    // The first `cap` fetches start together; after that each
                    // slot waits out its own delay before the next fetch.
                    if idx >= cap && !self.options.detail_throttle.pause(&self.cancel).await {
                        return (idx, None);
                    }
                    if self.cancel.is_cancelled() {
                        return (idx, None);
                    }
                    let outcome = enricher.enrich(stub).await;
                    tracing::debug!(done = idx + 1, total, "enriched stub");
                    (idx, Some(outcome))
                })
                .buffer_unordered(cap)
                .collect()
                .await;

        outcomes.sort_by_key(|(idx, _)| *idx);

        let mut records = Vec::with_capacity(outcomes.len());
        for (_, outcome) in outcomes {
            match outcome {
                Some(outcome) => {
                    if outcome.is_failure() {
                        stats.stubs_failed += 1;
                    }
                    records.push(outcome.into_record());
                }
                None => stats.stubs_skipped += 1,
            }
        }

        if stats.stubs_skipped > 0 {
            tracing::warn!(
                skipped = stats.stubs_skipped,
                total,
                "crawl cancelled; remaining detail pages not fetched"
            );
        }
        records
    }
}
