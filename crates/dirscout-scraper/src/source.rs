//! Where raw pages come from.
//!
//! The crawler only ever sees the [`DocumentSource`] trait; [`HttpSource`]
//! is the production implementation over `reqwest`.

use std::future::Future;
use std::time::Duration;

use dirscout_core::AppConfig;
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

const MAX_REDIRECTS: usize = 10;

/// Fetches a URL and returns its body, or a transport failure.
pub trait DocumentSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

/// HTTP page source with a per-request timeout, a fixed `User-Agent`, and
/// exponential-backoff retries on transient failures.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpSource {
    /// `max_retries` is the number of extra attempts after the first
    /// failure for retriable errors (429, 5xx, network). `0` disables retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// # Errors
    ///
    /// See [`HttpSource::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "zh-TW,zh;q=0.9,en;q=0.8")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ScraperError::RateLimited {
                url: url.to_owned(),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            // Challenge interstitials usually arrive as 403/503.
            let body = response.text().await.unwrap_or_default();
            if looks_like_bot_challenge(&body) {
                return Err(ScraperError::BotChallenge {
                    url: url.to_owned(),
                });
            }
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        if looks_like_bot_challenge(&body) {
            return Err(ScraperError::BotChallenge {
                url: url.to_owned(),
            });
        }
        Ok(body)
    }
}

impl DocumentSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        url::Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let body = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.fetch_once(url)
        })
        .await?;
        tracing::debug!(url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}

/// Anti-bot interstitials (Cloudflare and friends) that stand in for the
/// real page.
fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_cloudflare_banner = lowered.contains("attention required! | cloudflare");
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cookie_gate = lowered.contains("please enable cookies");
    let has_cf_chl = lowered.contains("cf-chl-");

    has_cloudflare_banner
        || has_challenge_platform
        || (has_just_a_moment && has_cookie_gate)
        || (has_just_a_moment && has_cf_chl)
}
