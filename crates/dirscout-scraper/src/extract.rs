//! Ordered fallback extraction for enriched fields.
//!
//! Each field has a chain of strategies declared in the site profile. The
//! chain is compiled once and evaluated in order against a parsed detail
//! page; the first strategy producing non-empty text wins. Running out of
//! strategies yields an empty string, which is the normal "not on this
//! page" value and never an error.

use dirscout_core::{DetailFields, FieldChains, StrategySpec};
use regex::Regex;
use scraper::Selector;

use crate::document::{node_text, parse_selector, Document};
use crate::error::ScraperError;

#[derive(Debug, Clone)]
pub enum Strategy {
    Selector(Selector),
    Pattern(Regex),
}

impl Strategy {
    /// # Errors
    ///
    /// Returns an error if the selector or pattern does not compile.
    pub fn compile(spec: &StrategySpec) -> Result<Self, ScraperError> {
        match spec {
            StrategySpec::Selector { selector } => parse_selector(selector).map(Self::Selector),
            StrategySpec::Pattern { pattern } => Regex::new(pattern)
                .map(Self::Pattern)
                .map_err(|source| ScraperError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }),
        }
    }

    fn apply(&self, doc: &Document) -> Option<String> {
        match self {
            Self::Selector(selector) => doc
                .select_first(selector)
                .map(node_text)
                .filter(|text| !text.is_empty()),
            Self::Pattern(regex) => {
                let caps = regex.captures(doc.text())?;
                let found = caps.get(1).or_else(|| caps.get(0))?;
                let value = found.as_str().trim();
                (!value.is_empty()).then(|| value.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StrategyChain {
    strategies: Vec<Strategy>,
}

impl StrategyChain {
    /// # Errors
    ///
    /// Returns the first compile error in the chain.
    pub fn compile(specs: &[StrategySpec]) -> Result<Self, ScraperError> {
        let strategies = specs
            .iter()
            .map(Strategy::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { strategies })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// First non-empty strategy result, or `""`.
    #[must_use]
    pub fn extract(&self, doc: &Document) -> String {
        self.strategies
            .iter()
            .find_map(|s| s.apply(doc))
            .unwrap_or_default()
    }
}

/// Compiled chains for all enriched fields.
#[derive(Debug, Clone)]
pub struct FieldExtractors {
    pub phone: StrategyChain,
    pub rating: StrategyChain,
    pub review_count: StrategyChain,
    pub address: StrategyChain,
}

impl FieldExtractors {
    /// # Errors
    ///
    /// Returns an error naming the first selector or pattern that fails to
    /// compile.
    pub fn compile(chains: &FieldChains) -> Result<Self, ScraperError> {
        Ok(Self {
            phone: StrategyChain::compile(&chains.phone)?,
            rating: StrategyChain::compile(&chains.rating)?,
            review_count: StrategyChain::compile(&chains.review_count)?,
            address: StrategyChain::compile(&chains.address)?,
        })
    }

    #[must_use]
    pub fn extract_all(&self, doc: &Document) -> DetailFields {
        DetailFields {
            phone: self.phone.extract(doc),
            rating: self.rating.extract(doc),
            review_count: self.review_count.extract(doc),
            address: self.address.extract(doc),
        }
    }
}
