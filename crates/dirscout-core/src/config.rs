use crate::app_config::{AppConfig, DelayRange};
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Safari/537.36";

/// Upper bound on simultaneous detail-page fetches.
pub const MAX_CONCURRENT_FETCHES: usize = 8;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`
/// lookup and no `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_delay = |var: &str, default: &str| -> Result<DelayRange, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<DelayRange>().map_err(|reason| invalid(var, reason))
    };

    let log_level = or_default("DIRSCOUT_LOG_LEVEL", "info");
    let profile_path = lookup("DIRSCOUT_PROFILE_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let output_path = PathBuf::from(or_default(
        "DIRSCOUT_OUTPUT_PATH",
        "dococar_taipei_detailing.xlsx",
    ));

    let request_timeout_secs = parse_u64("DIRSCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "DIRSCOUT_REQUEST_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    let user_agent = or_default("DIRSCOUT_USER_AGENT", DEFAULT_USER_AGENT);

    let max_concurrent_fetches = parse_usize("DIRSCOUT_MAX_CONCURRENT_FETCHES", "1")?;
    validate_concurrency(max_concurrent_fetches)
        .map_err(|reason| invalid("DIRSCOUT_MAX_CONCURRENT_FETCHES", reason))?;

    let listing_delay = parse_delay("DIRSCOUT_LISTING_DELAY_MS", "500-1000")?;
    let detail_delay = parse_delay("DIRSCOUT_DETAIL_DELAY_MS", "800-1500")?;
    let max_retries = parse_u32("DIRSCOUT_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("DIRSCOUT_RETRY_BACKOFF_BASE_SECS", "1")?;

    Ok(AppConfig {
        log_level,
        profile_path,
        output_path,
        request_timeout_secs,
        user_agent,
        max_concurrent_fetches,
        listing_delay,
        detail_delay,
        max_retries,
        retry_backoff_base_secs,
    })
}

/// Checks a concurrency cap against `1..=MAX_CONCURRENT_FETCHES`.
///
/// # Errors
///
/// Returns a human-readable reason when the cap is out of range.
pub fn validate_concurrency(cap: usize) -> Result<(), String> {
    if (1..=MAX_CONCURRENT_FETCHES).contains(&cap) {
        Ok(())
    } else {
        Err(format!(
            "concurrency cap {cap} must be between 1 and {MAX_CONCURRENT_FETCHES}"
        ))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
