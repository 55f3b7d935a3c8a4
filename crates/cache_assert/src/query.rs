// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Describes what an assertion expects to find in the cache.

/// What a single-key check expects of the cached value.
///
/// `Present` only requires the key to exist. `Value` additionally requires
/// the cached value to equal the given one, so for a cache whose values are
/// `Option<T>`, `Expected::Value(None)` asserts a cached `None` rather than
/// mere presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected<V> {
    /// The key must exist; its value is not inspected.
    Present,
    /// The key must exist and hold a value equal to this one.
    Value(V),
}

impl<V> Expected<V> {
    /// Returns the expected value, if this expectation compares values.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Present => None,
            Self::Value(value) => Some(value),
        }
    }
}

/// One entry of a batch assertion.
///
/// A batch may freely mix presence checks and value checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding<K, V> {
    /// The key must exist.
    Present(K),
    /// The key must exist and hold this value.
    Equals(K, V),
}

impl<K, V> Binding<K, V> {
    /// Creates a presence-only binding.
    pub fn present(key: impl Into<K>) -> Self {
        Self::Present(key.into())
    }

    /// Creates a binding that compares the cached value.
    pub fn equals(key: impl Into<K>, value: impl Into<V>) -> Self {
        Self::Equals(key.into(), value.into())
    }

    /// Returns the key this binding checks.
    #[must_use]
    pub fn key(&self) -> &K {
        match self {
            Self::Present(key) | Self::Equals(key, _) => key,
        }
    }
}

impl<K, V> From<(K, V)> for Binding<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::Equals(key, value)
    }
}

/// Input to [`CacheTestHelper::assert_has`](crate::CacheTestHelper::assert_has).
///
/// # Examples
///
/// ```
/// use cache_assert::{Binding, KeyQuery};
///
/// let single: KeyQuery<String, i32> = KeyQuery::equals("hits", 3);
/// let presence: KeyQuery<String, i32> = KeyQuery::present("hits");
/// let keys: KeyQuery<String, i32> = KeyQuery::keys(["hits", "misses"]);
/// let mixed: KeyQuery<String, i32> = KeyQuery::batch([
///     Binding::equals("hits", 3),
///     Binding::present("misses"),
/// ]);
/// # let _ = (single, presence, keys, mixed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyQuery<K, V> {
    /// One key, with or without an expected value.
    Single(K, Expected<V>),
    /// A batch of bindings, each checked independently.
    Batch(Vec<Binding<K, V>>),
    /// A sequence of keys, each checked for presence only.
    Keys(Vec<K>),
}

impl<K, V> KeyQuery<K, V> {
    /// Checks that `key` exists.
    pub fn present(key: impl Into<K>) -> Self {
        Self::Single(key.into(), Expected::Present)
    }

    /// Checks that `key` exists and holds `value`.
    pub fn equals(key: impl Into<K>, value: impl Into<V>) -> Self {
        Self::Single(key.into(), Expected::Value(value.into()))
    }

    /// Checks every binding in `bindings`.
    pub fn batch<I, B>(bindings: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Binding<K, V>>,
    {
        Self::Batch(bindings.into_iter().map(Into::into).collect())
    }

    /// Checks that every key in `keys` exists.
    pub fn keys<I>(keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        Self::Keys(keys.into_iter().map(Into::into).collect())
    }

    /// Flattens the query into the bindings it checks, in order.
    #[must_use]
    pub fn into_bindings(self) -> Vec<Binding<K, V>> {
        match self {
            Self::Single(key, Expected::Present) => vec![Binding::Present(key)],
            Self::Single(key, Expected::Value(value)) => vec![Binding::Equals(key, value)],
            Self::Batch(bindings) => bindings,
            Self::Keys(keys) => keys.into_iter().map(Binding::Present).collect(),
        }
    }
}

impl<K, V> From<Binding<K, V>> for KeyQuery<K, V> {
    fn from(binding: Binding<K, V>) -> Self {
        match binding {
            Binding::Present(key) => Self::Single(key, Expected::Present),
            Binding::Equals(key, value) => Self::Single(key, Expected::Value(value)),
        }
    }
}
