//! `crawl` and `plan` command handlers.
//!
//! Both resolve the effective configuration the same way: environment
//! first, then the site profile (file or built-in), then command-line
//! overrides on top.

use std::path::PathBuf;

use clap::Args;
use dirscout_core::config::validate_concurrency;
use dirscout_core::{load_profile, AppConfig, DelayRange, DiscoveryMode, SiteProfile};
use dirscout_export::{ReportWriter, RunSummary, WriteOutcome};
use dirscout_scraper::{CancellationToken, Crawler, CrawlerOptions, HttpSource};

/// Flags shared by `crawl` and `plan`.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Site profile YAML; defaults to the built-in dococar.com Taipei profile
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Override the profile's base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Visit listing pages 1..=N
    #[arg(long, conflicts_with_all = ["seed_url", "harvest"])]
    pub pages: Option<u32>,

    /// Harvest listing links from this page instead of a fixed range
    #[arg(long)]
    pub seed_url: Option<String>,

    /// Harvest listing links from the listing root
    #[arg(long)]
    pub harvest: bool,

    /// Simultaneous detail-page fetches (1-8)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Delay between listing pages, `min-max` or a fixed value in ms
    #[arg(long)]
    pub listing_delay_ms: Option<DelayRange>,

    /// Delay between detail pages, `min-max` or a fixed value in ms
    #[arg(long)]
    pub detail_delay_ms: Option<DelayRange>,

    /// Disable all courtesy delays
    #[arg(long, conflicts_with_all = ["listing_delay_ms", "detail_delay_ms"])]
    pub no_delay: bool,
}

/// Loads the profile named by the flags or the environment, falling back to
/// the built-in one.
fn resolve_profile(config: &AppConfig, args: &RunArgs) -> anyhow::Result<SiteProfile> {
    match args.profile.as_ref().or(config.profile_path.as_ref()) {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading site profile");
            Ok(load_profile(path)?)
        }
        None => Ok(SiteProfile::default()),
    }
}

/// Applies command-line overrides and re-validates the profile.
pub(crate) fn apply_overrides(
    config: &mut AppConfig,
    profile: &mut SiteProfile,
    args: &RunArgs,
) -> anyhow::Result<()> {
    if let Some(base_url) = &args.base_url {
        profile.base_url.clone_from(base_url);
    }

    if let Some(pages) = args.pages {
        profile.discovery = DiscoveryMode::Range { pages };
    } else if args.seed_url.is_some() || args.harvest {
        profile.discovery = DiscoveryMode::Harvest {
            seed_url: args.seed_url.clone(),
        };
    }

    if let Some(cap) = args.concurrency {
        validate_concurrency(cap).map_err(anyhow::Error::msg)?;
        config.max_concurrent_fetches = cap;
    }

    if args.no_delay {
        config.listing_delay = DelayRange::NONE;
        config.detail_delay = DelayRange::NONE;
    }
    if let Some(range) = args.listing_delay_ms {
        config.listing_delay = range;
    }
    if let Some(range) = args.detail_delay_ms {
        config.detail_delay = range;
    }

    profile.validate()?;
    Ok(())
}

fn build_crawler(
    mut config: AppConfig,
    args: &RunArgs,
) -> anyhow::Result<(AppConfig, Crawler<HttpSource>)> {
    let mut profile = resolve_profile(&config, args)?;
    apply_overrides(&mut config, &mut profile, args)?;

    let source = HttpSource::from_config(&config)?;
    let crawler = Crawler::new(source, &profile, CrawlerOptions::from_config(&config))?;
    tracing::info!(
        base_url = %profile.base_url,
        concurrency = config.max_concurrent_fetches,
        listing_delay_ms = %config.listing_delay,
        detail_delay_ms = %config.detail_delay,
        "crawler configured"
    );
    Ok((config, crawler))
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::warn!("interrupt received; finishing in-flight requests");
            cancel.cancel();
        }
        Err(e) => tracing::warn!(error = %e, "could not listen for ctrl-c"),
    }
}

/// Run a full crawl and write the report.
///
/// A cancelled run still writes whatever was collected.
///
/// # Errors
///
/// Returns an error if configuration is invalid, discovery fails, or the
/// report cannot be written in any format.
pub(crate) async fn run_crawl(
    config: AppConfig,
    args: &RunArgs,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (config, crawler) = build_crawler(config, args)?;

    let signal = tokio::spawn(cancel_on_ctrl_c(crawler.cancellation_token()));
    let result = crawler.run().await;
    signal.abort();
    let result = result?;

    let summary = RunSummary::from_result(&result);
    summary.log();
    print!("{summary}");

    let output = output.unwrap_or(config.output_path);
    match ReportWriter::new().write(&result, &output)? {
        WriteOutcome::NothingToWrite => {
            println!("no records collected; nothing written");
        }
        WriteOutcome::Written {
            path,
            format,
            rows,
            fell_back,
        } => {
            if fell_back {
                println!("{format} fallback used");
            }
            println!("wrote {rows} records to {}", path.display());
        }
    }
    Ok(())
}

/// Print the planned listing URLs, one per line.
///
/// # Errors
///
/// Returns an error if configuration is invalid or discovery fails.
pub(crate) async fn run_plan(config: AppConfig, args: &RunArgs) -> anyhow::Result<()> {
    let (_, crawler) = build_crawler(config, args)?;
    let pages = crawler.plan().await?;
    for url in &pages {
        println!("{url}");
    }
    tracing::info!(pages = pages.len(), "plan complete");
    Ok(())
}

#[cfg(test)]
#[path = "crawl_test.rs"]
mod tests;
