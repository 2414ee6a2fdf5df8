//! Default values and environment variable names.
//!
//! # Design
//! - Keep every default in one place so the CLI help and the loader agree.
//! - Durations are expressed in the unit their variable uses.

/// Base URL of the documents API.
pub const DEFAULT_API_URL: &str = "http://localhost:3011/api";
/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Age after which a cached response is refetched, in seconds.
pub const DEFAULT_STALE_SECS: u64 = 60;
/// Age after which a cached response is dropped, in seconds.
pub const DEFAULT_EVICT_SECS: u64 = 300;
/// Freshness window for the discipline list, in seconds.
pub const DEFAULT_DISCIPLINES_STALE_SECS: u64 = 300;
/// Retries applied to transient request failures.
pub const DEFAULT_RETRIES: u32 = 1;
/// Pause between retries, in milliseconds.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;
/// Quiet window for text filter input, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
/// Documents per list page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page size the client will request.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "ODF_API_URL";
/// Environment variable overriding the request timeout.
pub const ENV_TIMEOUT_SECS: &str = "ODF_HTTP_TIMEOUT_SECS";
/// Environment variable overriding the cache freshness window.
pub const ENV_STALE_SECS: &str = "ODF_CACHE_STALE_SECS";
/// Environment variable overriding the cache retention window.
pub const ENV_EVICT_SECS: &str = "ODF_CACHE_EVICT_SECS";
/// Environment variable overriding the retry count.
pub const ENV_RETRIES: &str = "ODF_RETRIES";
/// Environment variable overriding the debounce window.
pub const ENV_DEBOUNCE_MS: &str = "ODF_DEBOUNCE_MS";
/// Environment variable overriding the page size.
pub const ENV_PAGE_SIZE: &str = "ODF_PAGE_SIZE";
