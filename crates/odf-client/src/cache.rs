//! Request cache keyed by operation and parameters.
//!
//! # Design
//! - One slot per key. The slot's async mutex serialises fetches, so identical
//!   concurrent requests collapse into a single call and every waiter gets its
//!   value or its error.
//! - Entries are served while younger than the freshness window and dropped
//!   once older than the retention window.
//! - Only transient failures are retried.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use odf_api_models::DocumentListParams;
use odf_config::CacheSettings;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::error::ApiResult;

/// API operation a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Paginated, filtered document list.
    List,
    /// Single document.
    Detail,
    /// Parsed representation of a document.
    Parsed,
    /// Documents sharing a document code.
    DocumentCode,
    /// Raw content of two documents.
    Compare,
    /// Discipline list.
    Disciplines,
}

impl Operation {
    /// Stable name used in rendered keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail => "detail",
            Self::Parsed => "parsed",
            Self::DocumentCode => "document-code",
            Self::Compare => "compare",
            Self::Disciplines => "disciplines",
        }
    }
}

/// Cache key: operation name plus its ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    operation: Operation,
    params: Vec<String>,
}

impl QueryKey {
    /// Key for an arbitrary operation.
    #[must_use]
    pub const fn new(operation: Operation, params: Vec<String>) -> Self {
        Self { operation, params }
    }

    /// Key for a list request; parameters are rendered as `name=value`.
    #[must_use]
    pub fn list(params: &DocumentListParams) -> Self {
        Self::new(
            Operation::List,
            params
                .query_pairs()
                .into_iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect(),
        )
    }

    /// Key for a single document.
    #[must_use]
    pub fn detail(id: &str) -> Self {
        Self::new(Operation::Detail, vec![id.to_string()])
    }

    /// Key for a parsed representation.
    #[must_use]
    pub fn parsed(id: &str) -> Self {
        Self::new(Operation::Parsed, vec![id.to_string()])
    }

    /// Key for a document-code lookup.
    #[must_use]
    pub fn document_code(document_code: &str) -> Self {
        Self::new(Operation::DocumentCode, vec![document_code.to_string()])
    }

    /// Key for a comparison; order matters.
    #[must_use]
    pub fn compare(first_id: &str, second_id: &str) -> Self {
        Self::new(
            Operation::Compare,
            vec![first_id.to_string(), second_id.to_string()],
        )
    }

    /// Key for the discipline list.
    #[must_use]
    pub const fn disciplines() -> Self {
        Self::new(Operation::Disciplines, Vec::new())
    }

    /// Operation this key belongs to.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }
}

impl Display for QueryKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "odf-documents/{}", self.operation.as_str())?;
        for param in &self.params {
            write!(formatter, "/{param}")?;
        }
        Ok(())
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
}

#[derive(Default)]
struct SlotState {
    entry: Option<Entry>,
    failure: Option<crate::error::ApiError>,
}

#[derive(Default)]
struct Slot {
    completed: AtomicU64,
    state: tokio::sync::Mutex<SlotState>,
}

/// In-memory cache shared by every view of a session.
pub struct QueryCache {
    settings: CacheSettings,
    slots: Mutex<HashMap<QueryKey, Arc<Slot>>>,
}

impl QueryCache {
    /// Empty cache applying `settings`.
    #[must_use]
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            settings,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Policy in effect.
    #[must_use]
    pub const fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Return the cached value for `key`, or run `fetcher` and cache its
    /// result.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's error once retries are exhausted, or the error of
    /// the in-flight request this call waited on.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> ApiResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        self.prune();
        let slot = self.slot(&key);
        let seen = slot.completed.load(Ordering::Acquire);
        let mut state = slot.state.lock().await;

        if slot.completed.load(Ordering::Acquire) != seen {
            if let Some(err) = &state.failure {
                debug!(%key, "sharing failure of concurrent request");
                return Err(err.clone());
            }
            if let Some(value) = state
                .entry
                .as_ref()
                .and_then(|entry| entry.value.downcast_ref::<T>())
            {
                debug!(%key, "sharing result of concurrent request");
                return Ok(value.clone());
            }
        }

        let stale_after = self.stale_after(key.operation);
        if let Some(value) = state
            .entry
            .as_ref()
            .filter(|entry| entry.fetched_at.elapsed() < stale_after)
            .and_then(|entry| entry.value.downcast_ref::<T>())
        {
            debug!(%key, "cache hit");
            return Ok(value.clone());
        }

        debug!(%key, "cache miss");
        let outcome = self.fetch_with_retry(&key, &fetcher).await;
        match &outcome {
            Ok(value) => {
                state.entry = Some(Entry {
                    value: Arc::new(value.clone()),
                    fetched_at: Instant::now(),
                });
                state.failure = None;
            }
            Err(err) => state.failure = Some(err.clone()),
        }
        slot.completed.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    /// Drop the entry for `key`. Returns whether one existed.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        self.lock_slots().remove(key).is_some()
    }

    /// Drop every entry of `operation`. Returns how many were dropped.
    pub fn invalidate_operation(&self, operation: Operation) -> usize {
        let mut slots = self.lock_slots();
        let before = slots.len();
        slots.retain(|key, _| key.operation != operation);
        before - slots.len()
    }

    /// Drop everything.
    pub fn invalidate_all(&self) {
        self.lock_slots().clear();
    }

    /// Number of keys currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_slots().len()
    }

    /// Whether no keys are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stale_after(&self, operation: Operation) -> Duration {
        match operation {
            Operation::Disciplines => self.settings.disciplines_stale_after,
            _ => self.settings.stale_after,
        }
    }

    fn slot(&self, key: &QueryKey) -> Arc<Slot> {
        Arc::clone(self.lock_slots().entry(key.clone()).or_default())
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<QueryKey, Arc<Slot>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop idle slots whose entry outlived the retention window.
    fn prune(&self) {
        let evict_after = self.settings.evict_after;
        let mut slots = self.lock_slots();
        slots.retain(|key, slot| {
            let Ok(state) = slot.state.try_lock() else {
                return true;
            };
            let retain_for = evict_after.max(self.stale_after(key.operation));
            let keep = state
                .entry
                .as_ref()
                .is_some_and(|entry| entry.fetched_at.elapsed() < retain_for);
            if !keep {
                debug!(%key, "evicting cache entry");
            }
            keep
        });
    }

    async fn fetch_with_retry<T, F, Fut>(&self, key: &QueryKey, fetcher: &F) -> ApiResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let mut attempt = 0_u32;
        loop {
            match fetcher().await {
                Err(err) if err.is_transient() && attempt < self.settings.retries => {
                    attempt += 1;
                    warn!(%key, attempt, error = %err, "retrying after transient failure");
                    sleep(self.settings.retry_backoff).await;
                }
                outcome => return outcome,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::sync::atomic::AtomicUsize;

    fn cache() -> QueryCache {
        QueryCache::new(CacheSettings::default())
    }

    fn not_found() -> ApiError {
        ApiError::from_status(404, br#"{"message":"Document not found"}"#)
    }

    #[test]
    fn keys_render_operation_and_params() {
        assert_eq!(
            QueryKey::compare("a", "b").to_string(),
            "odf-documents/compare/a/b"
        );
        assert_eq!(QueryKey::disciplines().to_string(), "odf-documents/disciplines");
        let params = DocumentListParams {
            page: Some(1),
            discipline: Some("SWM".into()),
            ..DocumentListParams::default()
        };
        assert_eq!(
            QueryKey::list(&params).to_string(),
            "odf-documents/list/page=1/discipline=SWM"
        );
        assert_ne!(QueryKey::detail("x"), QueryKey::parsed("x"));
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_entries_are_served_without_refetching() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<u32, ApiError>(7)
        };

        assert_eq!(cache.fetch(QueryKey::detail("a"), fetcher).await, Ok(7));
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.fetch(QueryKey::detail("a"), fetcher).await, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entries_are_refetched() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move { Ok::<usize, ApiError>(counter.fetch_add(1, Ordering::SeqCst)) };

        assert_eq!(cache.fetch(QueryKey::detail("a"), fetcher).await, Ok(0));
        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.fetch(QueryKey::detail("a"), fetcher).await, Ok(1));
    }

    #[tokio::test(start_paused = true)]
    async fn disciplines_use_their_own_freshness_window() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<Vec<String>, ApiError>(vec!["SWM".to_string()])
        };

        cache
            .fetch(QueryKey::disciplines(), fetcher)
            .await
            .expect("first fetch");
        tokio::time::advance(Duration::from_secs(120)).await;
        cache
            .fetch(QueryKey::disciplines(), fetcher)
            .await
            .expect("cached");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        tokio::time::advance(Duration::from_secs(200)).await;
        cache
            .fetch(QueryKey::disciplines(), fetcher)
            .await
            .expect("refetched");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_identical_requests_share_one_call() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            sleep(Duration::from_millis(50)).await;
            Ok::<&'static str, ApiError>("payload")
        };

        let (first, second, third) = tokio::join!(
            cache.fetch(QueryKey::compare("a", "b"), fetcher),
            cache.fetch(QueryKey::compare("a", "b"), fetcher),
            cache.fetch(QueryKey::compare("a", "b"), fetcher),
        );
        assert_eq!(first, Ok("payload"));
        assert_eq!(second, Ok("payload"));
        assert_eq!(third, Ok("payload"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_waiters_share_the_failure() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            sleep(Duration::from_millis(50)).await;
            Err::<u8, ApiError>(not_found())
        };

        let (first, second) = tokio::join!(
            cache.fetch(QueryKey::detail("gone"), fetcher),
            cache.fetch(QueryKey::detail("gone"), fetcher),
        );
        assert_eq!(first, Err(not_found()));
        assert_eq!(second, Err(not_found()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // A later request is not a waiter and tries again.
        assert!(cache.fetch(QueryKey::detail("gone"), fetcher).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_once() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let flaky = move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ApiError::Transport {
                    message: "connection reset".into(),
                })
            } else {
                Ok(3_u8)
            }
        };
        assert_eq!(cache.fetch(QueryKey::detail("a"), flaky).await, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let always_down = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<u8, ApiError>(ApiError::from_status(503, b""))
        };
        let err = cache
            .fetch(QueryKey::detail("b"), always_down)
            .await
            .expect_err("retries exhausted");
        assert_eq!(err.status(), Some(503));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_not_retried() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<u8, ApiError>(not_found())
        };
        assert!(cache.fetch(QueryKey::detail("a"), fetcher).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidation_forces_refetch() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move { Ok::<usize, ApiError>(counter.fetch_add(1, Ordering::SeqCst)) };

        cache.fetch(QueryKey::detail("a"), fetcher).await.expect("a");
        cache.fetch(QueryKey::detail("b"), fetcher).await.expect("b");
        cache.fetch(QueryKey::parsed("a"), fetcher).await.expect("parsed");
        assert_eq!(cache.len(), 3);

        assert!(cache.invalidate(&QueryKey::detail("a")));
        assert!(!cache.invalidate(&QueryKey::detail("a")));
        assert_eq!(cache.fetch(QueryKey::detail("a"), fetcher).await, Ok(3));

        assert_eq!(cache.invalidate_operation(Operation::Detail), 2);
        assert_eq!(cache.len(), 1);
        cache.invalidate_all();
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_pruned() {
        let cache = cache();
        let fetcher = || async { Ok::<u8, ApiError>(1) };
        cache.fetch(QueryKey::detail("old"), fetcher).await.expect("old");
        tokio::time::advance(Duration::from_secs(301)).await;
        cache.fetch(QueryKey::detail("new"), fetcher).await.expect("new");
        assert_eq!(cache.len(), 1);
        assert!(!cache.invalidate(&QueryKey::detail("old")));
    }
}
