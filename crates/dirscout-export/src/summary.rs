use std::collections::BTreeMap;
use std::fmt;

use dirscout_core::CrawlResult;

/// Field-coverage statistics for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_planned: usize,
    pub pages_failed: usize,
    pub entities_found: usize,
    pub entities_failed: usize,
    pub entities_skipped: usize,
    pub records: usize,
    pub with_phone: usize,
    pub with_rating: usize,
    pub with_review_count: usize,
    pub with_address: usize,
    /// Record count per category label, ordered by label.
    pub by_category: BTreeMap<String, usize>,
    pub cancelled: bool,
}

impl RunSummary {
    #[must_use]
    pub fn from_result(result: &CrawlResult) -> Self {
        let stats = &result.stats;
        let mut summary = Self {
            pages_planned: stats.pages_planned,
            pages_failed: stats.pages_failed,
            entities_found: stats.stubs_found,
            entities_failed: stats.stubs_failed,
            entities_skipped: stats.stubs_skipped,
            records: result.records.len(),
            cancelled: stats.cancelled,
            ..Self::default()
        };

        for record in &result.records {
            summary.with_phone += usize::from(!record.phone.is_empty());
            summary.with_rating += usize::from(!record.rating.is_empty());
            summary.with_review_count += usize::from(!record.review_count.is_empty());
            summary.with_address += usize::from(!record.address.is_empty());
            *summary
                .by_category
                .entry(record.category.clone())
                .or_default() += 1;
        }
        summary
    }

    pub fn log(&self) {
        tracing::info!(
            pages_planned = self.pages_planned,
            pages_failed = self.pages_failed,
            entities_found = self.entities_found,
            entities_failed = self.entities_failed,
            entities_skipped = self.entities_skipped,
            records = self.records,
            with_phone = self.with_phone,
            with_rating = self.with_rating,
            with_review_count = self.with_review_count,
            with_address = self.with_address,
            cancelled = self.cancelled,
            "crawl summary"
        );
        for (category, count) in &self.by_category {
            tracing::info!(category = %category, count, "records per category");
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "pages: {} planned, {} failed",
            self.pages_planned, self.pages_failed
        )?;
        writeln!(
            f,
            "entities: {} found, {} detail failures, {} skipped",
            self.entities_found, self.entities_failed, self.entities_skipped
        )?;
        writeln!(f, "records: {}", self.records)?;
        writeln!(f, "  with phone:        {}", self.with_phone)?;
        writeln!(f, "  with rating:       {}", self.with_rating)?;
        writeln!(f, "  with review count: {}", self.with_review_count)?;
        writeln!(f, "  with address:      {}", self.with_address)?;
        for (category, count) in &self.by_category {
            writeln!(f, "  {category}: {count}")?;
        }
        if self.cancelled {
            writeln!(f, "run was cancelled before completion")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dirscout_core::{CrawlStats, EnrichedRecord};

    use super::*;

    fn record(category: &str, phone: &str, rating: &str) -> EnrichedRecord {
        EnrichedRecord {
            name: "店".to_string(),
            category: category.to_string(),
            detail_url: "https://dococar.com/detailing/1".to_string(),
            phone: phone.to_string(),
            rating: rating.to_string(),
            review_count: String::new(),
            address: String::new(),
        }
    }

    #[test]
    fn counts_non_empty_fields_and_categories() {
        let result = CrawlResult {
            records: vec![
                record("中正區", "02-2345-6789", "4.5"),
                record("中正區", "", "4.0"),
                record("大安區", "02-8765-4321", ""),
            ],
            stats: CrawlStats {
                pages_planned: 12,
                pages_failed: 1,
                stubs_found: 4,
                stubs_failed: 1,
                stubs_skipped: 1,
                cancelled: true,
            },
        };
        let summary = RunSummary::from_result(&result);

        assert_eq!(summary.records, 3);
        assert_eq!(summary.with_phone, 2);
        assert_eq!(summary.with_rating, 2);
        assert_eq!(summary.with_review_count, 0);
        assert_eq!(summary.with_address, 0);
        assert_eq!(summary.by_category["中正區"], 2);
        assert_eq!(summary.by_category["大安區"], 1);
        assert_eq!(summary.pages_failed, 1);
        assert_eq!(summary.entities_skipped, 1);
        assert!(summary.cancelled);

        let text = summary.to_string();
        assert!(text.contains("pages: 12 planned, 1 failed"));
        assert!(text.contains("中正區: 2"));
        assert!(text.contains("cancelled"));
    }

    #[test]
    fn empty_result_is_all_zero() {
        let summary = RunSummary::from_result(&CrawlResult::default());
        assert_eq!(summary, RunSummary::default());
    }
}
