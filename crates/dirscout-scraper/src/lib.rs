pub mod crawl;
pub mod discovery;
pub mod document;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod listing;
mod rate_limit;
pub mod source;
pub mod throttle;

pub use crawl::{Crawler, CrawlerOptions};
pub use discovery::DiscoveryPlanner;
pub use document::Document;
pub use enrich::{DetailEnricher, EnrichOutcome};
pub use error::{CrawlError, ScraperError};
pub use extract::{FieldExtractors, StrategyChain};
pub use listing::{HeadingStatus, ListingScan, ListingScanner};
pub use source::{DocumentSource, HttpSource};
pub use throttle::Throttle;
pub use tokio_util::sync::CancellationToken;
