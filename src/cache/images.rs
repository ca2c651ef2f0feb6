//! In-memory image cache keyed by URL
//!
//! Provides an `ImageCache` that stores downloaded image bytes for the life of
//! the process. Concurrent requests for the same unresolved URL share a single
//! upstream fetch and all receive the same bytes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::data::{ImageSource, LaunchError};

/// One cache slot; empty until its first successful fetch
type Slot = Arc<OnceCell<Bytes>>;

/// Process-lifetime image cache with request coalescing
///
/// There is no eviction, no TTL and no size bound. Entries stay until the
/// cache is dropped.
pub struct ImageCache {
    source: Arc<dyn ImageSource>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl ImageCache {
    /// Creates an empty cache backed by `source`
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached bytes for `url`, if a fetch has completed
    pub fn get(&self, url: &str) -> Option<Bytes> {
        self.slots().get(url).and_then(|slot| slot.get().cloned())
    }

    /// Whether `url` has cached bytes
    pub fn contains(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    /// Number of URLs with cached bytes
    pub fn len(&self) -> usize {
        self.slots().values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns cached bytes for `url`, fetching and storing them on a miss
    ///
    /// Overlapping calls for the same URL wait on one upstream fetch. A failed
    /// fetch stores nothing, so the next call tries again.
    pub async fn fetch_and_cache(&self, url: &str) -> Result<Bytes, LaunchError> {
        let slot = {
            let mut slots = self.slots();
            Arc::clone(slots.entry(url.to_string()).or_default())
        };

        if let Some(bytes) = slot.get() {
            debug!(url, "image cache hit");
            return Ok(bytes.clone());
        }

        let bytes = slot
            .get_or_try_init(|| async {
                debug!(url, "image cache miss, fetching");
                self.source.fetch_image(url).await
            })
            .await
            .map_err(|err| {
                warn!(url, error = %err, "image fetch failed");
                err
            })?;

        Ok(bytes.clone())
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Image source that counts calls and fails for configured URLs
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
        failing: Mutex<HashSet<String>>,
        delay: Option<Duration>,
    }

    impl CountingSource {
        fn with_delay(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Default::default()
            }
        }

        fn fail(&self, url: &str) {
            self.failing.lock().unwrap().insert(url.to_string());
        }

        fn recover(&self, url: &str) {
            self.failing.lock().unwrap().remove(url);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageSource for CountingSource {
        async fn fetch_image(&self, url: &str) -> Result<Bytes, LaunchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.lock().unwrap().contains(url) {
                return Err(LaunchError::status(404));
            }
            Ok(Bytes::from(format!("image:{url}")))
        }
    }

    fn cache_with(source: &Arc<CountingSource>) -> ImageCache {
        ImageCache::new(Arc::clone(source) as Arc<dyn ImageSource>)
    }

    #[test]
    fn test_get_on_empty_cache_is_miss() {
        let source = Arc::new(CountingSource::default());
        let cache = cache_with(&source);

        assert!(cache.get("img://a").is_none());
        assert!(cache.is_empty());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_after_fetch_does_not_refetch() {
        let source = Arc::new(CountingSource::default());
        let cache = cache_with(&source);

        let fetched = cache.fetch_and_cache("img://a").await.expect("fetch should succeed");
        assert_eq!(source.calls(), 1);

        let cached = cache.get("img://a").expect("bytes should be cached");
        assert_eq!(cached, fetched);

        let again = cache.fetch_and_cache("img://a").await.unwrap();
        assert_eq!(again, fetched);
        assert_eq!(source.calls(), 1, "cache hit must not reach upstream");
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let source = Arc::new(CountingSource::default());
        source.fail("img://broken");
        let cache = cache_with(&source);

        let result = cache.fetch_and_cache("img://broken").await;

        assert_eq!(result, Err(LaunchError::status(404)));
        assert!(cache.get("img://broken").is_none());
        assert!(!cache.contains("img://broken"));
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_retry_after_failure_reaches_upstream() {
        let source = Arc::new(CountingSource::default());
        source.fail("img://flaky");
        let cache = cache_with(&source);

        assert!(cache.fetch_and_cache("img://flaky").await.is_err());
        source.recover("img://flaky");
        let bytes = cache.fetch_and_cache("img://flaky").await.unwrap();

        assert_eq!(bytes, Bytes::from("image:img://flaky"));
        assert_eq!(source.calls(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_for_same_url_coalesce() {
        let source = Arc::new(CountingSource::with_delay(Duration::from_millis(20)));
        let cache = cache_with(&source);

        let (first, second) = tokio::join!(
            cache.fetch_and_cache("img://a"),
            cache.fetch_and_cache("img://a")
        );

        let first = first.expect("first caller should succeed");
        let second = second.expect("second caller should succeed");
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(source.calls(), 1, "overlapping requests should share one fetch");
    }

    #[tokio::test]
    async fn test_distinct_urls_fetch_independently() {
        let source = Arc::new(CountingSource::default());
        let cache = cache_with(&source);

        let urls = ["img://a", "img://b", "img://c"];
        let results =
            futures::future::join_all(urls.iter().map(|url| cache.fetch_and_cache(url))).await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(cache.len(), 3);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_cache_is_shareable_across_tasks() {
        let source = Arc::new(CountingSource::default());
        let cache = Arc::new(cache_with(&source));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.fetch_and_cache(&format!("img://{}", i % 2)).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(cache.len(), 2);
        assert!(source.calls() <= 4);
    }
}
