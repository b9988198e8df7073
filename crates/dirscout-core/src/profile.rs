//! Site profile: everything site-specific the crawler needs to know.
//!
//! A profile names the site's base URL, how listing pages are discovered,
//! which anchors lead to detail pages, how the category label is cut out of
//! the listing heading, and the ordered strategy chain for every enriched
//! field. Profiles are plain YAML so the heading markers and selectors can
//! follow the site without a rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How the crawler enumerates listing pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DiscoveryMode {
    /// `{base_url}/{listing_path}/{i}` for `i` in `1..=pages`.
    Range { pages: u32 },
    /// Fetch a seed page and collect every `/{listing_path}/…` link on it.
    /// The seed defaults to `{base_url}/{listing_path}`.
    Harvest {
        #[serde(default)]
        seed_url: Option<String>,
    },
}

/// One extraction strategy inside a field's chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrategySpec {
    /// CSS selector; the first matching node's trimmed text.
    Selector { selector: String },
    /// Regular expression over the page's visible text; capture group 1 if
    /// the pattern has one, otherwise the whole match.
    Pattern { pattern: String },
}

impl StrategySpec {
    #[must_use]
    pub fn selector(s: &str) -> Self {
        Self::Selector {
            selector: s.to_string(),
        }
    }

    #[must_use]
    pub fn pattern(p: &str) -> Self {
        Self::Pattern {
            pattern: p.to_string(),
        }
    }
}

/// Strategy chains for the four enriched fields, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChains {
    pub phone: Vec<StrategySpec>,
    pub rating: Vec<StrategySpec>,
    pub review_count: Vec<StrategySpec>,
    pub address: Vec<StrategySpec>,
}

/// Phone pattern shared with existing consumers of the output: 2-4 digits,
/// optional hyphen, 3-4 digits, optional hyphen, 3-4 digits.
pub const PHONE_PATTERN: &str = r"(\d{2,4}-?\d{3,4}-?\d{3,4})";

impl Default for FieldChains {
    fn default() -> Self {
        Self {
            phone: vec![StrategySpec::pattern(PHONE_PATTERN)],
            rating: vec![
                StrategySpec::selector(r#"[itemprop="ratingValue"]"#),
                StrategySpec::selector(".rating-value"),
                StrategySpec::selector(".star-rating"),
            ],
            review_count: vec![
                StrategySpec::selector(r#"[itemprop="ratingCount"]"#),
                StrategySpec::selector(".review-count"),
                StrategySpec::selector(".reviews-count"),
            ],
            address: vec![
                StrategySpec::selector(r#"[itemprop="address"]"#),
                StrategySpec::selector(".address"),
                StrategySpec::selector(".location"),
            ],
        }
    }
}

/// Where the category label lives on a listing page and how to cut it out.
///
/// The label is the heading text after the last `prefix` and before the
/// first `suffix`. An empty marker is not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRule {
    #[serde(default = "default_heading_selector")]
    pub selector: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    /// Label used when the heading is missing; the page ordinal is appended.
    pub placeholder: String,
}

fn default_heading_selector() -> String {
    "h1".to_string()
}

impl Default for HeadingRule {
    fn default() -> Self {
        Self {
            selector: default_heading_selector(),
            prefix: "台北市".to_string(),
            suffix: "汽".to_string(),
            placeholder: "未知區域".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    pub base_url: String,
    pub listing_path: String,
    pub discovery: DiscoveryMode,
    /// Path prefix shared by every detail-page link, e.g. `/detailing/`.
    pub detail_prefix: String,
    /// Optional node inside a detail anchor that carries the clean name.
    #[serde(default)]
    pub title_selector: Option<String>,
    #[serde(default)]
    pub heading: HeadingRule,
    #[serde(default)]
    pub fields: FieldChains,
}

impl Default for SiteProfile {
    /// The dococar.com Taipei car-detailing directory.
    fn default() -> Self {
        Self {
            base_url: "https://dococar.com".to_string(),
            listing_path: "coating/taipei".to_string(),
            discovery: DiscoveryMode::Range { pages: 12 },
            detail_prefix: "/detailing/".to_string(),
            title_selector: Some(".title".to_string()),
            heading: HeadingRule::default(),
            fields: FieldChains::default(),
        }
    }
}

impl SiteProfile {
    /// Parse and validate a profile from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the YAML is malformed or fails validation.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let profile: SiteProfile = serde_yaml::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    /// `{base_url}/{listing_path}` with redundant slashes removed.
    #[must_use]
    pub fn listing_root(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.listing_path.trim_matches('/')
        )
    }

    /// Path prefix of listing-page links, e.g. `/coating/taipei/`.
    #[must_use]
    pub fn listing_link_prefix(&self) -> String {
        format!("/{}/", self.listing_path.trim_matches('/'))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = url::Url::parse(&self.base_url).map_err(|e| {
            ConfigError::Validation(format!("base_url \"{}\" is not a URL: {e}", self.base_url))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "base_url \"{}\" must use http or https",
                self.base_url
            )));
        }

        if self.listing_path.trim_matches('/').trim().is_empty() {
            return Err(ConfigError::Validation(
                "listing_path must be non-empty".to_string(),
            ));
        }

        if !self.detail_prefix.starts_with('/') || self.detail_prefix.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "detail_prefix \"{}\" must be an absolute path like /detailing/",
                self.detail_prefix
            )));
        }

        if self.heading.selector.trim().is_empty() {
            return Err(ConfigError::Validation(
                "heading.selector must be non-empty".to_string(),
            ));
        }

        if let DiscoveryMode::Harvest {
            seed_url: Some(seed),
        } = &self.discovery
        {
            url::Url::parse(seed).map_err(|e| {
                ConfigError::Validation(format!("seed_url \"{seed}\" is not a URL: {e}"))
            })?;
        }

        let chains = [
            ("phone", &self.fields.phone),
            ("rating", &self.fields.rating),
            ("review_count", &self.fields.review_count),
            ("address", &self.fields.address),
        ];
        for (field, chain) in chains {
            for spec in chain {
                let raw = match spec {
                    StrategySpec::Selector { selector } => selector,
                    StrategySpec::Pattern { pattern } => pattern,
                };
                if raw.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "field '{field}' has an empty strategy"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Load and validate a site profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profile(path: &Path) -> Result<SiteProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    SiteProfile::from_yaml(&content)
}
