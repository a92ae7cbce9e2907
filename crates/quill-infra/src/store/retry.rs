//! Retry and timeout decorator for any [`PostStore`].
//!
//! Transient failures (unavailable backend, timed-out attempt) are retried a
//! fixed number of times with exponential backoff. Everything else, including
//! conflicts, is returned on the first occurrence.
//!
//! A timed-out conditional write may still have landed, so a conflict seen
//! after a timeout of the same call is reported as an indeterminate outcome
//! rather than as a key collision.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use quill_core::StoreError;
use quill_core::ports::{IndexQuery, PostStore, Record};

/// Bounded retry policy applied at the store boundary.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each further attempt.
    pub base_backoff: Duration,
    /// Upper bound for a single attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(50),
            attempt_timeout: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Load the policy from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let millis = |name: &str, default: Duration| {
            std::env::var(name)
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        Self {
            max_attempts: std::env::var("STORE_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_attempts),
            base_backoff: millis("STORE_BACKOFF_MS", defaults.base_backoff),
            attempt_timeout: millis("STORE_TIMEOUT_MS", defaults.attempt_timeout),
        }
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Store wrapper applying a [`RetryPolicy`] to every call.
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: PostStore> RetryingStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn run<T, F, Fut>(&self, op: &'static str, mut call: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        let mut timed_out = false;

        loop {
            let result = match tokio::time::timeout(self.policy.attempt_timeout, call()).await {
                Ok(result) => result,
                Err(_) => {
                    timed_out = true;
                    Err(StoreError::Unavailable(format!(
                        "{op} timed out after {:?}",
                        self.policy.attempt_timeout
                    )))
                }
            };

            match result {
                Err(StoreError::Conflict { key }) if timed_out => {
                    tracing::error!(
                        op,
                        attempts = attempt,
                        key = %key,
                        "Conflict after a timed-out attempt"
                    );
                    return Err(StoreError::Unavailable(format!(
                        "{op} outcome indeterminate after timeout"
                    )));
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.policy.backoff(attempt);
                    tracing::warn!(
                        op,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Store call failed, will retry"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_transient() {
                        tracing::error!(
                            op,
                            attempts = attempt,
                            error = %e,
                            "Store call failed after max retries"
                        );
                    }
                    return Err(e);
                }
                Ok(value) => return Ok(value),
            }
        }
    }
}

#[async_trait]
impl<S: PostStore> PostStore for RetryingStore<S> {
    async fn put_if_absent(&self, key: &str, record: Record) -> Result<(), StoreError> {
        self.run("put_if_absent", || {
            self.inner.put_if_absent(key, record.clone())
        })
        .await
    }

    async fn query_by_index(&self, query: &IndexQuery) -> Result<Vec<Record>, StoreError> {
        self.run("query_by_index", || self.inner.query_by_index(query))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls with the given error.
    struct FlakyStore {
        calls: AtomicU32,
        failures: u32,
        error: StoreError,
        hang: bool,
    }

    impl FlakyStore {
        fn new(failures: u32, error: StoreError) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures,
                error,
                hang: false,
            }
        }

        async fn step(&self) -> Result<(), StoreError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                if self.hang {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                }
                return Err(self.error.clone());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PostStore for FlakyStore {
        async fn put_if_absent(&self, _key: &str, _record: Record) -> Result<(), StoreError> {
            self.step().await
        }

        async fn query_by_index(&self, _query: &IndexQuery) -> Result<Vec<Record>, StoreError> {
            self.step().await.map(|_| Vec::new())
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_backoff: Duration::from_millis(1),
            attempt_timeout: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let store = RetryingStore::new(
            FlakyStore::new(2, StoreError::Unavailable("blip".into())),
            fast_policy(3),
        );

        store.put_if_absent("k", Record::new()).await.unwrap();
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let store = RetryingStore::new(
            FlakyStore::new(10, StoreError::Unavailable("down".into())),
            fast_policy(3),
        );

        let err = store
            .query_by_index(&IndexQuery::new("status", "published"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_conflict_is_not_retried() {
        let store = RetryingStore::new(
            FlakyStore::new(1, StoreError::Conflict { key: "k".into() }),
            fast_policy(3),
        );

        let err = store.put_if_absent("k", Record::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_attempt_times_out_and_retries() {
        let mut flaky = FlakyStore::new(1, StoreError::Unavailable("slow".into()));
        flaky.hang = true;
        let store = RetryingStore::new(flaky, fast_policy(2));

        store.put_if_absent("k", Record::new()).await.unwrap();
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 2);
    }

    /// Writes land immediately, but the first acknowledgement never arrives.
    #[derive(Default)]
    struct SlowAckStore {
        calls: AtomicU32,
        keys: Mutex<HashSet<String>>,
    }

    #[async_trait]
    impl PostStore for SlowAckStore {
        async fn put_if_absent(&self, key: &str, _record: Record) -> Result<(), StoreError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let inserted = self.keys.lock().unwrap().insert(key.to_string());
            if call == 0 {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            if inserted {
                Ok(())
            } else {
                Err(StoreError::Conflict { key: key.to_string() })
            }
        }

        async fn query_by_index(&self, _query: &IndexQuery) -> Result<Vec<Record>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_conflict_after_timeout_is_indeterminate() {
        let store = RetryingStore::new(SlowAckStore::default(), fast_policy(3));

        let err = store.put_if_absent("k", Record::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(ref msg) if msg.contains("indeterminate")));
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 2);
        assert!(store.inner().keys.lock().unwrap().contains("k"));
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy {
            base_backoff: Duration::from_millis(50),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(50));
        assert_eq!(policy.backoff(2), Duration::from_millis(100));
        assert_eq!(policy.backoff(3), Duration::from_millis(200));
    }
}
