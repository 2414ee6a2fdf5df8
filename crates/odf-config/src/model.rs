//! Typed client configuration.

use std::time::Duration;

use url::Url;

use crate::defaults::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_DISCIPLINES_STALE_SECS, DEFAULT_EVICT_SECS,
    DEFAULT_PAGE_SIZE, DEFAULT_RETRIES, DEFAULT_RETRY_BACKOFF_MS, DEFAULT_STALE_SECS,
    DEFAULT_TIMEOUT_SECS,
};
use crate::validate::ensure_trailing_slash;

/// Request cache policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Entries younger than this are served without a request.
    pub stale_after: Duration,
    /// Entries older than this are dropped.
    pub evict_after: Duration,
    /// Freshness window applied to the discipline list.
    pub disciplines_stale_after: Duration,
    /// Retries for transient failures.
    pub retries: u32,
    /// Pause between retries.
    pub retry_backoff: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(DEFAULT_STALE_SECS),
            evict_after: Duration::from_secs(DEFAULT_EVICT_SECS),
            disciplines_stale_after: Duration::from_secs(DEFAULT_DISCIPLINES_STALE_SECS),
            retries: DEFAULT_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

/// Everything the client needs to talk to the documents API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL; always ends with `/` so relative joins keep its path.
    pub api_url: Url,
    /// Upper bound for a single request.
    pub timeout: Duration,
    /// Request cache policy.
    pub cache: CacheSettings,
    /// Quiet window for debounced filter input.
    pub debounce: Duration,
    /// Documents per list page.
    pub page_size: u32,
}

impl ClientConfig {
    /// Configuration pointing at `api_url` with every other value defaulted.
    #[must_use]
    pub fn with_api_url(api_url: Url) -> Self {
        Self {
            api_url: ensure_trailing_slash(api_url),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache: CacheSettings::default(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
