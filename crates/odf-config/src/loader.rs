//! Environment-driven configuration loading.
//!
//! # Design
//! - Read every variable through an injectable lookup so tests never touch the
//!   process environment.
//! - Unset variables fall back to the defaults in `defaults.rs`; set but
//!   invalid variables are errors.

use std::time::Duration;

use tracing::debug;

use crate::defaults::{
    DEFAULT_API_URL, ENV_API_URL, ENV_DEBOUNCE_MS, ENV_EVICT_SECS, ENV_PAGE_SIZE, ENV_RETRIES,
    ENV_STALE_SECS, ENV_TIMEOUT_SECS, MAX_PAGE_SIZE,
};
use crate::error::ConfigResult;
use crate::model::ClientConfig;
use crate::validate::{parse_api_url, parse_bounded_u32, parse_bounded_u64};

const MAX_TIMEOUT_SECS: u64 = 600;
const MAX_CACHE_SECS: u64 = 86_400;
const MAX_RETRIES: u32 = 10;
const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Load configuration from the process environment.
///
/// # Errors
///
/// Returns [`crate::ConfigError::InvalidField`] when a variable is set to an
/// unacceptable value.
pub fn load_from_env() -> ConfigResult<ClientConfig> {
    load_with(|name| std::env::var(name).ok())
}

/// Load configuration through `lookup`, which maps variable names to values.
///
/// # Errors
///
/// Returns [`crate::ConfigError::InvalidField`] when a variable is set to an
/// unacceptable value.
pub fn load_with<F>(lookup: F) -> ConfigResult<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    let api_url = parse_api_url(
        ENV_API_URL,
        read(ENV_API_URL).as_deref().unwrap_or(DEFAULT_API_URL),
    )?;
    let mut config = ClientConfig::with_api_url(api_url);

    if let Some(raw) = read(ENV_TIMEOUT_SECS) {
        config.timeout = Duration::from_secs(parse_bounded_u64(
            ENV_TIMEOUT_SECS,
            &raw,
            1,
            MAX_TIMEOUT_SECS,
        )?);
    }
    if let Some(raw) = read(ENV_STALE_SECS) {
        config.cache.stale_after =
            Duration::from_secs(parse_bounded_u64(ENV_STALE_SECS, &raw, 0, MAX_CACHE_SECS)?);
    }
    if let Some(raw) = read(ENV_EVICT_SECS) {
        config.cache.evict_after =
            Duration::from_secs(parse_bounded_u64(ENV_EVICT_SECS, &raw, 0, MAX_CACHE_SECS)?);
    }
    if let Some(raw) = read(ENV_RETRIES) {
        config.cache.retries = parse_bounded_u32(ENV_RETRIES, &raw, 0, MAX_RETRIES)?;
    }
    if let Some(raw) = read(ENV_DEBOUNCE_MS) {
        config.debounce = Duration::from_millis(parse_bounded_u64(
            ENV_DEBOUNCE_MS,
            &raw,
            0,
            MAX_DEBOUNCE_MS,
        )?);
    }
    if let Some(raw) = read(ENV_PAGE_SIZE) {
        config.page_size = parse_bounded_u32(ENV_PAGE_SIZE, &raw, 1, MAX_PAGE_SIZE)?;
    }

    if config.cache.evict_after < config.cache.stale_after {
        config.cache.evict_after = config.cache.stale_after;
    }

    debug!(api_url = %config.api_url, "client configuration loaded");
    Ok(config)
}
