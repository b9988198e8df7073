//! Listing-page scanning: category label plus entity stubs.

use dirscout_core::{EntityStub, HeadingRule, SiteProfile};
use scraper::Selector;
use url::Url;

use crate::document::{compact_text, node_text, parse_selector, Document};
use crate::error::ScraperError;

/// How the category label was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadingStatus {
    /// The label was cut out of the heading.
    Labelled,
    /// No heading node on the page; the placeholder label was used.
    Missing,
    /// A heading exists but the markers left nothing of it; the placeholder
    /// label was used. Carries the heading text.
    Unlabelled(String),
}

/// What one listing page contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingScan {
    pub category: String,
    pub heading: HeadingStatus,
    pub stubs: Vec<EntityStub>,
}

#[derive(Debug, Clone)]
pub struct ListingScanner {
    base: Url,
    detail_anchor: Selector,
    title: Option<Selector>,
    heading: Selector,
    rule: HeadingRule,
}

impl ListingScanner {
    /// # Errors
    ///
    /// Returns an error if the base URL or any profile selector is invalid.
    pub fn from_profile(profile: &SiteProfile) -> Result<Self, ScraperError> {
        let base = Url::parse(&profile.base_url).map_err(|e| ScraperError::InvalidUrl {
            url: profile.base_url.clone(),
            reason: e.to_string(),
        })?;
        let detail_anchor = parse_selector(&format!(
            "a[href^=\"{}\"]",
            profile.detail_prefix.replace('"', "\\\"")
        ))?;
        let title = profile
            .title_selector
            .as_deref()
            .map(parse_selector)
            .transpose()?;
        let heading = parse_selector(&profile.heading.selector)?;

        Ok(Self {
            base,
            detail_anchor,
            title,
            heading,
            rule: profile.heading.clone(),
        })
    }

    /// Scans one listing page. `ordinal` is the page's 1-based position in
    /// the discovery plan and only shows up in placeholder labels.
    #[must_use]
    pub fn scan(&self, doc: &Document, ordinal: usize) -> ListingScan {
        let placeholder = || format!("{}{ordinal}", self.rule.placeholder);
        let (category, heading) = match doc.select_first(&self.heading).map(node_text) {
            None => (placeholder(), HeadingStatus::Missing),
            Some(text) => {
                let label = self.category_label(&text);
                if label.is_empty() {
                    (placeholder(), HeadingStatus::Unlabelled(text))
                } else {
                    (label, HeadingStatus::Labelled)
                }
            }
        };

        let stubs = doc
            .select(&self.detail_anchor)
            .filter_map(|anchor| {
                let name = self
                    .title
                    .as_ref()
                    .and_then(|sel| anchor.select(sel).next())
                    .map_or_else(|| compact_text(anchor), node_text);
                if name.is_empty() {
                    return None;
                }
                let href = anchor.value().attr("href")?;
                let detail_url = self.base.join(href).ok()?;
                Some(EntityStub {
                    name,
                    category: category.clone(),
                    detail_url: detail_url.to_string(),
                })
            })
            .collect();

        ListingScan {
            category,
            heading,
            stubs,
        }
    }

    /// Heading text after the last prefix marker and before the first
    /// following suffix marker.
    #[must_use]
    pub fn category_label(&self, heading: &str) -> String {
        let mut label = heading;
        if !self.rule.prefix.is_empty() {
            label = label.rsplit(self.rule.prefix.as_str()).next().unwrap_or(label);
        }
        if !self.rule.suffix.is_empty() {
            label = label.split(self.rule.suffix.as_str()).next().unwrap_or(label);
        }
        label.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> ListingScanner {
        ListingScanner::from_profile(&SiteProfile::default()).unwrap()
    }

    fn page(body: &str) -> Document {
        Document::parse(&format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn category_from_heading_markers() {
        let doc = page("<h1>台北市中正區汽車美容</h1>");
        let scan = scanner().scan(&doc, 1);
        assert_eq!(scan.category, "中正區");
        assert_eq!(scan.heading, HeadingStatus::Labelled);
    }

    #[test]
    fn category_without_markers_keeps_heading() {
        assert_eq!(scanner().category_label("大安區"), "大安區");
    }

    #[test]
    fn empty_markers_are_not_applied() {
        let profile = SiteProfile {
            heading: HeadingRule {
                prefix: String::new(),
                suffix: String::new(),
                ..HeadingRule::default()
            },
            ..SiteProfile::default()
        };
        let scanner = ListingScanner::from_profile(&profile).unwrap();
        assert_eq!(scanner.category_label(" 台北市信義區汽車美容 "), "台北市信義區汽車美容");
    }

    #[test]
    fn missing_heading_uses_placeholder_with_ordinal() {
        let doc = page("<a href='/detailing/1'>Shop</a>");
        let scan = scanner().scan(&doc, 7);
        assert_eq!(scan.category, "未知區域7");
        assert_eq!(scan.heading, HeadingStatus::Missing);
        assert_eq!(scan.stubs[0].category, "未知區域7");
    }

    #[test]
    fn heading_cut_to_nothing_is_not_reported_missing() {
        let doc = page("<h1>台北市汽車美容</h1><a href='/detailing/1'>Shop</a>");
        let scan = scanner().scan(&doc, 4);
        assert_eq!(scan.category, "未知區域4");
        assert_eq!(
            scan.heading,
            HeadingStatus::Unlabelled("台北市汽車美容".to_string())
        );
        assert_eq!(scan.stubs[0].category, "未知區域4");
    }

    #[test]
    fn counts_only_valid_detail_anchors() {
        let doc = page(
            r#"<h1>台北市大安區汽車美容</h1>
            <a href="/detailing/101"><div class="title">晶亮汽車美容</div><span>★4.8</span></a>
            <a href="/detailing/102">  鍍膜專家  </a>
            <a href="/detailing/103"><img src="x.png"></a>
            <a href="/detailing/104"><div class="title">   </div></a>
            <a href="/coating/taipei/2">下一頁</a>
            <a href="https://other.example.com/detailing/9">外部</a>
            <a>no href</a>"#,
        );
        let scan = scanner().scan(&doc, 1);
        let names: Vec<&str> = scan.stubs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["晶亮汽車美容", "鍍膜專家"]);
    }

    #[test]
    fn title_node_preferred_over_anchor_text() {
        let doc = page(
            r#"<a href="/detailing/55"><i class="icon"></i><div class="title"> 光速洗車 </div><p>營業中</p></a>"#,
        );
        let scan = scanner().scan(&doc, 1);
        assert_eq!(scan.stubs[0].name, "光速洗車");
    }

    #[test]
    fn detail_urls_are_absolute() {
        let doc = page(r#"<h1>台北市中山區汽車美容</h1><a href="/detailing/abc?x=1">A</a>"#);
        let scan = scanner().scan(&doc, 3);
        assert_eq!(
            scan.stubs,
            vec![EntityStub {
                name: "A".to_string(),
                category: "中山區".to_string(),
                detail_url: "https://dococar.com/detailing/abc?x=1".to_string(),
            }]
        );
    }

    #[test]
    fn page_without_cards_yields_no_stubs() {
        let doc = page("<h1>台北市北投區汽車美容</h1><p>尚無店家</p>");
        let scan = scanner().scan(&doc, 12);
        assert_eq!(scan.category, "北投區");
        assert!(scan.stubs.is_empty());
    }

    #[test]
    fn relative_base_is_rejected() {
        let profile = SiteProfile {
            base_url: "dococar.com".to_string(),
            ..SiteProfile::default()
        };
        assert!(matches!(
            ListingScanner::from_profile(&profile),
            Err(ScraperError::InvalidUrl { .. })
        ));
    }
}
