pub mod app_config;
pub mod config;
pub mod profile;
pub mod records;

pub use app_config::{AppConfig, DelayRange};
pub use config::{load_app_config, load_app_config_from_env};
pub use profile::{
    load_profile, DiscoveryMode, FieldChains, HeadingRule, SiteProfile, StrategySpec,
};
pub use records::{CrawlResult, CrawlStats, DetailFields, EnrichedRecord, EntityStub, COLUMNS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read site profile {path}: {source}")]
    ProfileFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site profile: {0}")]
    ProfileFileParse(#[from] serde_yaml::Error),

    #[error("invalid site profile: {0}")]
    Validation(String),
}
