// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The helper tests use to arrange and assert on cache contents.

use std::{
    fmt::{self, Debug, Display},
    marker::PhantomData,
    time::Duration,
};

use futures::executor::block_on;

use crate::{
    Binding, CacheAccessor, CacheMutator, Error, FailureMode, HelperBuilder, KeyQuery, Mismatch,
    builder::{DEFAULT_NAME, DEFAULT_TTL},
    mismatch::render_report,
    telemetry::{self, Operation},
};

/// One check against the accessor.
enum Check<K, V> {
    Has(Binding<K, V>),
    Missing(K),
}

/// Seeds, clears, and asserts on a cache through injected capabilities.
///
/// Every method blocks the calling thread until the capability future
/// completes. Capability errors are returned unchanged. Assertion failures
/// panic with a message naming the offending key, attributed to the caller's
/// line.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-util")]
/// # fn main() -> Result<(), cache_assert::Error> {
/// use cache_assert::{CacheTestHelper, KeyQuery, testing::FakeCache};
///
/// let helper: CacheTestHelper<String, String, _, _> = CacheTestHelper::from_store(FakeCache::new());
///
/// helper
///     .seed_cache([("user:1", "alice")])?
///     .assert_has(KeyQuery::equals("user:1", "alice"))?
///     .assert_missing("user:2")?;
///
/// helper.clear_cache()?;
/// helper.assert_missing("user:1")?;
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "test-util"))]
/// # fn main() {}
/// ```
pub struct CacheTestHelper<K, V, M, A> {
    mutator: M,
    accessor: A,
    name: &'static str,
    default_ttl: Duration,
    failure_mode: FailureMode,
    _phantom: PhantomData<fn() -> (K, V)>,
}

impl<K, V, M, A> Debug for CacheTestHelper<K, V, M, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheTestHelper")
            .field("name", &self.name)
            .field("default_ttl", &self.default_ttl)
            .field("failure_mode", &self.failure_mode)
            .finish_non_exhaustive()
    }
}

impl<K, V, M, A> CacheTestHelper<K, V, M, A>
where
    M: CacheMutator<K, V>,
    A: CacheAccessor<K, V>,
{
    /// Creates a helper with the default configuration.
    #[must_use]
    pub fn new(mutator: M, accessor: A) -> Self {
        Self::from_parts(mutator, accessor, DEFAULT_NAME, DEFAULT_TTL, FailureMode::default())
    }

    /// Starts configuring a helper.
    #[must_use]
    pub fn builder(mutator: M, accessor: A) -> HelperBuilder<K, V, M, A> {
        HelperBuilder::new(mutator, accessor)
    }

    pub(crate) fn from_parts(mutator: M, accessor: A, name: &'static str, default_ttl: Duration, failure_mode: FailureMode) -> Self {
        Self {
            mutator,
            accessor,
            name,
            default_ttl,
            failure_mode,
            _phantom: PhantomData,
        }
    }

    /// Returns the name reported in log events.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the TTL [`seed_cache`](Self::seed_cache) applies.
    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns how multi-key failures are reported.
    #[must_use]
    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Returns the write capability.
    #[must_use]
    pub fn mutator(&self) -> &M {
        &self.mutator
    }

    /// Returns the read capability.
    #[must_use]
    pub fn accessor(&self) -> &A {
        &self.accessor
    }
}

impl<K, V, S> CacheTestHelper<K, V, S, S>
where
    S: CacheMutator<K, V> + CacheAccessor<K, V> + Clone,
{
    /// Creates a helper that reads and writes through the same store.
    #[must_use]
    pub fn from_store(store: S) -> Self {
        Self::new(store.clone(), store)
    }
}

impl<K, V, M, A> CacheTestHelper<K, V, M, A>
where
    K: Display,
    V: PartialEq + Debug,
    M: CacheMutator<K, V>,
    A: CacheAccessor<K, V>,
{
    /// Puts every entry into the cache with the default TTL.
    ///
    /// # Errors
    ///
    /// Returns the mutator's error unchanged. Entries before the failing one
    /// stay written.
    pub fn seed_cache<I, IK, IV>(&self, entries: I) -> Result<&Self, Error>
    where
        I: IntoIterator<Item = (IK, IV)>,
        IK: Into<K>,
        IV: Into<V>,
    {
        self.seed_cache_for(entries, self.default_ttl)
    }

    /// Puts every entry into the cache with the given TTL.
    ///
    /// # Errors
    ///
    /// Returns the mutator's error unchanged.
    pub fn seed_cache_for<I, IK, IV>(&self, entries: I, ttl: Duration) -> Result<&Self, Error>
    where
        I: IntoIterator<Item = (IK, IV)>,
        IK: Into<K>,
        IV: Into<V>,
    {
        let mut seeded = 0_usize;
        for (key, value) in entries {
            block_on(self.mutator.put(&key.into(), value.into(), ttl))?;
            seeded += 1;
        }

        telemetry::seeded(self.name, seeded, ttl);
        Ok(self)
    }

    /// Same as [`seed_cache`](Self::seed_cache).
    ///
    /// # Errors
    ///
    /// Returns the mutator's error unchanged.
    pub fn with_cache<I, IK, IV>(&self, entries: I) -> Result<&Self, Error>
    where
        I: IntoIterator<Item = (IK, IV)>,
        IK: Into<K>,
        IV: Into<V>,
    {
        self.seed_cache(entries)
    }

    /// Removes every entry from the cache.
    ///
    /// # Errors
    ///
    /// Returns the mutator's error unchanged.
    pub fn clear_cache(&self) -> Result<(), Error> {
        block_on(self.mutator.flush())?;
        telemetry::flushed(self.name);
        Ok(())
    }

    /// Asserts that the cache holds what `query` describes.
    ///
    /// Batch and key-sequence queries are checked as by
    /// [`assert_has_all`](Self::assert_has_all).
    ///
    /// # Errors
    ///
    /// Returns the accessor's error unchanged.
    ///
    /// # Panics
    ///
    /// Panics if a key is missing or holds a different value.
    #[track_caller]
    pub fn assert_has(&self, query: KeyQuery<K, V>) -> Result<&Self, Error> {
        self.assert_has_all(query.into_bindings())
    }

    /// Same as [`assert_has`](Self::assert_has).
    ///
    /// # Errors
    ///
    /// Returns the accessor's error unchanged.
    ///
    /// # Panics
    ///
    /// Panics if a key is missing or holds a different value.
    #[track_caller]
    pub fn see_in_cache(&self, query: KeyQuery<K, V>) -> Result<&Self, Error> {
        self.assert_has(query)
    }

    /// Asserts every binding: presence for [`Binding::Present`], presence and
    /// equality for [`Binding::Equals`].
    ///
    /// # Errors
    ///
    /// Returns the accessor's error unchanged.
    ///
    /// # Panics
    ///
    /// Panics if any binding does not hold.
    #[track_caller]
    pub fn assert_has_all<I>(&self, bindings: I) -> Result<&Self, Error>
    where
        I: IntoIterator<Item = Binding<K, V>>,
    {
        self.enforce(Operation::AssertHas, bindings.into_iter().map(Check::Has))?;
        Ok(self)
    }

    /// Asserts that `key` is not in the cache.
    ///
    /// # Errors
    ///
    /// Returns the accessor's error unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the key is present.
    #[track_caller]
    pub fn assert_missing(&self, key: impl Into<K>) -> Result<&Self, Error> {
        self.enforce(Operation::AssertMissing, [Check::Missing(key.into())])?;
        Ok(self)
    }

    /// Asserts that none of `keys` is in the cache.
    ///
    /// # Errors
    ///
    /// Returns the accessor's error unchanged.
    ///
    /// # Panics
    ///
    /// Panics if any key is present.
    #[track_caller]
    pub fn assert_all_missing<I>(&self, keys: I) -> Result<&Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        self.enforce(
            Operation::AssertMissing,
            keys.into_iter().map(|key| Check::Missing(key.into())),
        )?;
        Ok(self)
    }

    /// Evaluates `query` without panicking.
    ///
    /// Every binding is checked; an empty result means the cache holds what
    /// the query describes.
    ///
    /// # Errors
    ///
    /// Returns the accessor's error unchanged.
    pub fn mismatches(&self, query: KeyQuery<K, V>) -> Result<Vec<Mismatch<K, V>>, Error> {
        self.evaluate(query.into_bindings().into_iter().map(Check::Has), false)
    }

    /// Evaluates a missing-keys check without panicking.
    ///
    /// # Errors
    ///
    /// Returns the accessor's error unchanged.
    pub fn missing_mismatches<I>(&self, keys: I) -> Result<Vec<Mismatch<K, V>>, Error>
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        self.evaluate(keys.into_iter().map(|key| Check::Missing(key.into())), false)
    }

    #[track_caller]
    #[expect(clippy::panic, reason = "assertion failures are reported as test panics")]
    fn enforce<I>(&self, operation: Operation, checks: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = Check<K, V>>,
    {
        let mut checked = 0_usize;
        let checks = checks.into_iter().inspect(|_| checked += 1);
        let mismatches = self.evaluate(checks, self.failure_mode == FailureMode::FailFast)?;

        if mismatches.is_empty() {
            telemetry::passed(self.name, operation, checked);
            return Ok(());
        }

        let report = render_report(&mismatches);
        telemetry::failed(self.name, operation, checked, mismatches.len(), &report);
        panic!("{report}");
    }

    fn evaluate<I>(&self, checks: I, stop_at_first: bool) -> Result<Vec<Mismatch<K, V>>, Error>
    where
        I: IntoIterator<Item = Check<K, V>>,
    {
        let mut mismatches = Vec::new();
        for check in checks {
            if let Some(mismatch) = self.check(check)? {
                mismatches.push(mismatch);
                if stop_at_first {
                    break;
                }
            }
        }
        Ok(mismatches)
    }

    fn check(&self, check: Check<K, V>) -> Result<Option<Mismatch<K, V>>, Error> {
        match check {
            Check::Has(Binding::Present(key)) => {
                let present = block_on(self.accessor.has(&key))?;
                Ok((!present).then_some(Mismatch::Missing { key }))
            }
            Check::Has(Binding::Equals(key, expected)) => {
                let actual = block_on(self.accessor.get(&key))?;
                if actual.as_ref() == Some(&expected) {
                    Ok(None)
                } else {
                    Ok(Some(Mismatch::Unequal { key, expected, actual }))
                }
            }
            Check::Missing(key) => {
                let present = block_on(self.accessor.has(&key))?;
                Ok(present.then_some(Mismatch::Unexpected { key }))
            }
        }
    }
}
