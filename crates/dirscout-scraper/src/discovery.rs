//! Listing-page discovery.

use std::collections::HashSet;

use dirscout_core::{DiscoveryMode, SiteProfile};
use url::Url;

use crate::document::{parse_selector, Document};
use crate::error::ScraperError;
use crate::source::DocumentSource;

/// Produces the ordered, duplicate-free list of listing URLs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryPlanner {
    Range {
        root: String,
        pages: u32,
    },
    Harvest {
        base: String,
        seed_url: String,
        link_prefix: String,
    },
}

impl DiscoveryPlanner {
    #[must_use]
    pub fn from_profile(profile: &SiteProfile) -> Self {
        match &profile.discovery {
            DiscoveryMode::Range { pages } => Self::Range {
                root: profile.listing_root(),
                pages: *pages,
            },
            DiscoveryMode::Harvest { seed_url } => Self::Harvest {
                base: profile.base_url.clone(),
                seed_url: seed_url.clone().unwrap_or_else(|| profile.listing_root()),
                link_prefix: profile.listing_link_prefix(),
            },
        }
    }

    /// # Errors
    ///
    /// Only the harvest strategy can fail: the seed page could not be
    /// fetched, or a URL involved is malformed.
    pub async fn plan<S: DocumentSource>(&self, source: &S) -> Result<Vec<String>, ScraperError> {
        match self {
            Self::Range { root, pages } => plan_range(root, *pages),
            Self::Harvest {
                base,
                seed_url,
                link_prefix,
            } => {
                let body = source.fetch(seed_url).await?;
                harvest_links(&body, base, link_prefix)
            }
        }
    }
}

/// `{root}/{i}` for `i` in `1..=pages`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `root` does not form valid URLs.
pub fn plan_range(root: &str, pages: u32) -> Result<Vec<String>, ScraperError> {
    let root = root.trim_end_matches('/');
    (1..=pages)
        .map(|i| {
            let raw = format!("{root}/{i}");
            Url::parse(&raw)
                .map(String::from)
                .map_err(|e| ScraperError::InvalidUrl {
                    url: raw,
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Absolute URLs of every `a[href^=link_prefix]` on a seed page, first-seen
/// order, duplicates removed. Fragments are dropped, so `/x/1#list` and
/// `/x/1` are the same page.
///
/// # Errors
///
/// Returns an error if `base` is not an absolute URL or the prefix cannot
/// form a selector.
pub fn harvest_links(
    body: &str,
    base: &str,
    link_prefix: &str,
) -> Result<Vec<String>, ScraperError> {
    let base = Url::parse(base).map_err(|e| ScraperError::InvalidUrl {
        url: base.to_owned(),
        reason: e.to_string(),
    })?;
    let selector = parse_selector(&format!(
        "a[href^=\"{}\"]",
        link_prefix.replace('"', "\\\"")
    ))?;

    let doc = Document::parse(body);
    let mut seen = HashSet::new();
    let links = doc
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .map(|mut url| {
            url.set_fragment(None);
            String::from(url)
        })
        .filter(|url| seen.insert(url.clone()))
        .collect();
    Ok(links)
}
