// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory fake for exercising the helper and cache-dependent code.
//!
//! [`FakeCache`] keeps values and their TTLs in a map, records every
//! capability call, and can be told to fail calls on demand. It never expires
//! anything: the TTL is stored only so tests can check what was requested.

use std::{collections::HashMap, fmt, hash::Hash, sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::{CacheAccessor, CacheMutator, Error};

/// A capability call recorded by [`FakeCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOp<K, V> {
    /// `put` was called.
    Put {
        /// The key written.
        key: K,
        /// The value written.
        value: V,
        /// The TTL requested.
        ttl: Duration,
    },
    /// `flush` was called.
    Flush,
    /// `has` was called with the given key.
    Has(K),
    /// `get` was called with the given key.
    Get(K),
}

type FailPredicate<K, V> = Box<dyn Fn(&CacheOp<K, V>) -> bool + Send + Sync>;

#[derive(Debug, Clone)]
struct Stored<V> {
    value: V,
    ttl: Duration,
}

/// A recording in-memory cache double.
///
/// Clones share storage, the operation log, and the failure predicate, so one
/// clone can be handed to the helper while the test inspects another.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cache_assert::{CacheTestHelper, testing::{CacheOp, FakeCache}};
///
/// let store = FakeCache::<String, i32>::new();
/// let helper: CacheTestHelper<String, i32, _, _> = CacheTestHelper::from_store(store.clone());
///
/// helper.seed_cache_for([("hits", 1)], Duration::from_secs(5)).unwrap();
///
/// assert_eq!(store.ttl_of(&"hits".to_string()), Some(Duration::from_secs(5)));
/// assert_eq!(
///     store.operations(),
///     vec![CacheOp::Put { key: "hits".to_string(), value: 1, ttl: Duration::from_secs(5) }],
/// );
///
/// store.fail_when(|op| matches!(op, CacheOp::Flush));
/// assert!(helper.clear_cache().is_err());
/// ```
pub struct FakeCache<K, V> {
    data: Arc<Mutex<HashMap<K, Stored<V>>>>,
    operations: Arc<Mutex<Vec<CacheOp<K, V>>>>,
    fail_when: Arc<Mutex<Option<FailPredicate<K, V>>>>,
}

impl<K, V> fmt::Debug for FakeCache<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeCache")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl<K, V> Clone for FakeCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl<K, V> Default for FakeCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FakeCache<K, V> {
    /// Creates an empty fake.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Makes every call for which `predicate` returns `true` fail.
    ///
    /// Failing calls are still recorded but leave the stored data untouched.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&CacheOp<K, V>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Removes the failure predicate.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Clears the operation log.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    /// Records `op`, then reports whether it should fail.
    fn record(&self, op: CacheOp<K, V>) -> bool {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        self.operations.lock().push(op);
        fail
    }
}

impl<K, V> FakeCache<K, V>
where
    K: Eq + Hash,
{
    /// Returns `true` if `key` is stored. Not recorded.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.data.lock().contains_key(key)
    }

    /// Returns the TTL `key` was last written with. Not recorded.
    #[must_use]
    pub fn ttl_of(&self, key: &K) -> Option<Duration> {
        self.data.lock().get(key).map(|stored| stored.ttl)
    }
}

impl<K, V> FakeCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Returns the value stored under `key`. Not recorded.
    #[must_use]
    pub fn value_of(&self, key: &K) -> Option<V> {
        self.data.lock().get(key).map(|stored| stored.value.clone())
    }
}

impl<K, V> FakeCache<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Returns every recorded call, oldest first.
    #[must_use]
    pub fn operations(&self) -> Vec<CacheOp<K, V>> {
        self.operations.lock().clone()
    }
}

impl<K, V> CacheMutator<K, V> for FakeCache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn put(&self, key: &K, value: V, ttl: Duration) -> Result<(), Error> {
        let op = CacheOp::Put {
            key: key.clone(),
            value: value.clone(),
            ttl,
        };
        if self.record(op) {
            return Err(Error::caused_by("fake: put failed"));
        }
        self.data.lock().insert(key.clone(), Stored { value, ttl });
        Ok(())
    }

    async fn flush(&self) -> Result<(), Error> {
        if self.record(CacheOp::Flush) {
            return Err(Error::caused_by("fake: flush failed"));
        }
        self.data.lock().clear();
        Ok(())
    }
}

impl<K, V> CacheAccessor<K, V> for FakeCache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn has(&self, key: &K) -> Result<bool, Error> {
        if self.record(CacheOp::Has(key.clone())) {
            return Err(Error::caused_by("fake: has failed"));
        }
        Ok(self.data.lock().contains_key(key))
    }

    async fn get(&self, key: &K) -> Result<Option<V>, Error> {
        if self.record(CacheOp::Get(key.clone())) {
            return Err(Error::caused_by("fake: get failed"));
        }
        Ok(self.data.lock().get(key).map(|stored| stored.value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    fn key(k: &str) -> String {
        k.to_string()
    }

    #[test]
    fn put_then_get_returns_value_and_keeps_ttl() -> Result<(), Error> {
        let cache = FakeCache::<String, i32>::new();

        block_on(cache.put(&key("a"), 1, Duration::from_secs(30)))?;

        assert_eq!(block_on(cache.get(&key("a")))?, Some(1));
        assert_eq!(cache.ttl_of(&key("a")), Some(Duration::from_secs(30)));
        assert_eq!(cache.value_of(&key("a")), Some(1));
        Ok(())
    }

    #[test]
    fn flush_removes_everything() -> Result<(), Error> {
        let cache = FakeCache::<String, i32>::new();
        block_on(cache.put(&key("a"), 1, Duration::ZERO))?;
        block_on(cache.put(&key("b"), 2, Duration::ZERO))?;

        block_on(cache.flush())?;

        assert_eq!(cache.entry_count(), 0);
        assert!(!block_on(cache.has(&key("a")))?);
        Ok(())
    }

    #[test]
    fn operations_are_recorded_in_order() -> Result<(), Error> {
        let cache = FakeCache::<String, i32>::new();

        block_on(cache.put(&key("a"), 1, Duration::from_secs(1)))?;
        block_on(cache.has(&key("a")))?;
        block_on(cache.get(&key("b")))?;
        block_on(cache.flush())?;

        assert_eq!(
            cache.operations(),
            vec![
                CacheOp::Put {
                    key: key("a"),
                    value: 1,
                    ttl: Duration::from_secs(1),
                },
                CacheOp::Has(key("a")),
                CacheOp::Get(key("b")),
                CacheOp::Flush,
            ]
        );

        cache.clear_operations();
        assert!(cache.operations().is_empty());
        Ok(())
    }

    #[test]
    fn failing_put_is_recorded_but_not_stored() {
        let cache = FakeCache::<String, i32>::new();
        cache.fail_when(|op| matches!(op, CacheOp::Put { key, .. } if key == "bad"));

        let error = block_on(cache.put(&key("bad"), 1, Duration::ZERO)).expect_err("put should fail");

        assert!(error.to_string().contains("fake: put failed"));
        assert!(!cache.contains_key(&key("bad")));
        assert_eq!(cache.operations().len(), 1);
    }

    #[test]
    fn clear_failures_restores_success() -> Result<(), Error> {
        let cache = FakeCache::<String, i32>::new();
        cache.fail_when(|_| true);
        let _ = block_on(cache.has(&key("a"))).expect_err("has should fail");

        cache.clear_failures();
        assert!(!block_on(cache.has(&key("a")))?);
        Ok(())
    }

    #[test]
    fn clones_share_state() -> Result<(), Error> {
        let cache = FakeCache::<String, i32>::new();
        let clone = cache.clone();

        block_on(clone.put(&key("a"), 5, Duration::ZERO))?;

        assert!(cache.contains_key(&key("a")));
        assert_eq!(cache.operations(), clone.operations());
        Ok(())
    }

    #[test]
    fn debug_reports_failure_predicate() {
        let cache = FakeCache::<String, i32>::new();
        cache.fail_when(|_| false);
        assert!(format!("{cache:?}").contains("fail_when: true"));
    }
}
