//! Detail-page enrichment of entity stubs.

use dirscout_core::{EnrichedRecord, EntityStub};

use crate::document::Document;
use crate::error::ScraperError;
use crate::extract::FieldExtractors;
use crate::source::DocumentSource;

/// Result of enriching one stub. Both variants carry a complete record.
#[derive(Debug)]
pub enum EnrichOutcome {
    Enriched(EnrichedRecord),
    /// The detail page could not be read; enriched fields are empty.
    Failed {
        record: EnrichedRecord,
        error: ScraperError,
    },
}

impl EnrichOutcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    #[must_use]
    pub fn record(&self) -> &EnrichedRecord {
        match self {
            Self::Enriched(record) | Self::Failed { record, .. } => record,
        }
    }

    #[must_use]
    pub fn into_record(self) -> EnrichedRecord {
        match self {
            Self::Enriched(record) | Self::Failed { record, .. } => record,
        }
    }
}

pub struct DetailEnricher<'a, S> {
    source: &'a S,
    fields: &'a FieldExtractors,
}

impl<'a, S: DocumentSource> DetailEnricher<'a, S> {
    #[must_use]
    pub fn new(source: &'a S, fields: &'a FieldExtractors) -> Self {
        Self { source, fields }
    }

    /// Fetches `stub.detail_url` and extracts every enriched field.
    ///
    /// Never fails: an unreachable page produces [`EnrichOutcome::Failed`]
    /// holding a record with empty enriched fields.
    pub async fn enrich(&self, stub: EntityStub) -> EnrichOutcome {
        match self.source.fetch(&stub.detail_url).await {
            Ok(body) => {
                let fields = {
                    let doc = Document::parse(&body);
                    self.fields.extract_all(&doc)
                };
                EnrichOutcome::Enriched(EnrichedRecord::new(stub, fields))
            }
            Err(error) => {
                tracing::warn!(
                    url = %stub.detail_url,
                    name = %stub.name,
                    error = %error,
                    "detail page unavailable; keeping stub with empty fields"
                );
                EnrichOutcome::Failed {
                    record: EnrichedRecord::unenriched(stub),
                    error,
                }
            }
        }
    }
}
