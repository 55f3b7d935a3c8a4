// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring a [`CacheTestHelper`].

use std::{marker::PhantomData, time::Duration};

use crate::{CacheAccessor, CacheMutator, CacheTestHelper};

/// TTL applied by [`CacheTestHelper::seed_cache`] unless configured otherwise: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Name attached to log events unless configured otherwise.
pub(crate) const DEFAULT_NAME: &str = "cache";

/// How a failing assertion over several keys is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Stop at the first failing key and report it.
    #[default]
    FailFast,
    /// Check every key, then report all failures together.
    Collect,
}

/// Builder for a [`CacheTestHelper`].
///
/// Created by [`CacheTestHelper::builder`].
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-util")]
/// # fn main() {
/// use std::time::Duration;
///
/// use cache_assert::{CacheTestHelper, FailureMode, testing::FakeCache};
///
/// let store = FakeCache::<String, String>::new();
/// let helper: CacheTestHelper<String, String, _, _> = CacheTestHelper::builder(store.clone(), store)
///     .name("sessions")
///     .default_ttl(Duration::from_secs(300))
///     .failure_mode(FailureMode::Collect)
///     .build();
///
/// assert_eq!(helper.name(), "sessions");
/// # }
/// # #[cfg(not(feature = "test-util"))]
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct HelperBuilder<K, V, M, A> {
    mutator: M,
    accessor: A,
    name: &'static str,
    default_ttl: Duration,
    failure_mode: FailureMode,
    _phantom: PhantomData<fn() -> (K, V)>,
}

impl<K, V, M, A> HelperBuilder<K, V, M, A>
where
    M: CacheMutator<K, V>,
    A: CacheAccessor<K, V>,
{
    pub(crate) fn new(mutator: M, accessor: A) -> Self {
        Self {
            mutator,
            accessor,
            name: DEFAULT_NAME,
            default_ttl: DEFAULT_TTL,
            failure_mode: FailureMode::default(),
            _phantom: PhantomData,
        }
    }

    /// Sets the name reported in log events.
    #[must_use]
    pub fn name(self, name: &'static str) -> Self {
        Self { name, ..self }
    }

    /// Sets the TTL used by [`CacheTestHelper::seed_cache`].
    #[must_use]
    pub fn default_ttl(self, ttl: Duration) -> Self {
        Self { default_ttl: ttl, ..self }
    }

    /// Sets how multi-key assertion failures are reported.
    #[must_use]
    pub fn failure_mode(self, failure_mode: FailureMode) -> Self {
        Self { failure_mode, ..self }
    }

    /// Builds the helper.
    #[must_use]
    pub fn build(self) -> CacheTestHelper<K, V, M, A> {
        CacheTestHelper::from_parts(self.mutator, self.accessor, self.name, self.default_ttl, self.failure_mode)
    }
}
