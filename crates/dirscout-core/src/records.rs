/// Output column order. Fixed regardless of which fields were found.
pub const COLUMNS: [&str; 7] = [
    "store_name",
    "district",
    "detail_url",
    "phone",
    "rating",
    "reviews",
    "address",
];

/// An entity as seen on a listing page, before its detail page is visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityStub {
    pub name: String,
    pub category: String,
    /// Always absolute.
    pub detail_url: String,
}

/// Attributes pulled from a detail page. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub phone: String,
    pub rating: String,
    pub review_count: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub name: String,
    pub category: String,
    pub detail_url: String,
    pub phone: String,
    pub rating: String,
    pub review_count: String,
    pub address: String,
}

impl EnrichedRecord {
    #[must_use]
    pub fn new(stub: EntityStub, fields: DetailFields) -> Self {
        Self {
            name: stub.name,
            category: stub.category,
            detail_url: stub.detail_url,
            phone: fields.phone,
            rating: fields.rating,
            review_count: fields.review_count,
            address: fields.address,
        }
    }

    /// A record whose detail page could not be read.
    #[must_use]
    pub fn unenriched(stub: EntityStub) -> Self {
        Self::new(stub, DetailFields::default())
    }

    /// Cell values in [`COLUMNS`] order.
    #[must_use]
    pub fn row(&self) -> [&str; 7] {
        [
            &self.name,
            &self.category,
            &self.detail_url,
            &self.phone,
            &self.rating,
            &self.review_count,
            &self.address,
        ]
    }
}

/// Counters accumulated over one crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_planned: usize,
    pub pages_failed: usize,
    pub stubs_found: usize,
    pub stubs_failed: usize,
    /// Stubs never fetched because the run was cancelled.
    pub stubs_skipped: usize,
    pub cancelled: bool,
}

/// Everything one run produced, in stub discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    pub records: Vec<EnrichedRecord>,
    pub stats: CrawlStats,
}

impl CrawlResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub() -> EntityStub {
        EntityStub {
            name: "晶亮汽車美容".to_string(),
            category: "中正區".to_string(),
            detail_url: "https://dococar.com/detailing/123".to_string(),
        }
    }

    #[test]
    fn unenriched_record_keeps_stub_and_blanks_fields() {
        let record = EnrichedRecord::unenriched(stub());
        assert_eq!(record.name, "晶亮汽車美容");
        assert_eq!(record.category, "中正區");
        assert!(record.phone.is_empty());
        assert!(record.rating.is_empty());
        assert!(record.review_count.is_empty());
        assert!(record.address.is_empty());
    }

    #[test]
    fn row_follows_column_order() {
        let record = EnrichedRecord::new(
            stub(),
            DetailFields {
                phone: "02-2345-6789".to_string(),
                rating: "4.8".to_string(),
                review_count: "120".to_string(),
                address: "台北市中正區忠孝西路一段".to_string(),
            },
        );
        assert_eq!(
            record.row(),
            [
                "晶亮汽車美容",
                "中正區",
                "https://dococar.com/detailing/123",
                "02-2345-6789",
                "4.8",
                "120",
                "台北市中正區忠孝西路一段",
            ]
        );
        assert_eq!(record.row().len(), COLUMNS.len());
    }
}
