// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Capabilities a cache under test exposes to the assertion helper.
//!
//! The helper never talks to a cache directly. Writes go through a
//! [`CacheMutator`] and reads through a [`CacheAccessor`], so a test can hand
//! in the real cache, a wrapper around it, or a fake. One value may serve as
//! both: the traits are implemented for `&T` and `Arc<T>`.

use std::{sync::Arc, time::Duration};

use crate::Error;

/// Write side of a cache under test.
pub trait CacheMutator<K, V>: Send + Sync {
    /// Stores `value` under `key`, expiring after `ttl`.
    ///
    /// Expiry is entirely the cache's business; the helper only passes the
    /// duration along.
    fn put(&self, key: &K, value: V, ttl: Duration) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes every entry, regardless of who wrote it.
    fn flush(&self) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Read side of a cache under test.
pub trait CacheAccessor<K, V>: Send + Sync {
    /// Returns `true` if the cache currently holds `key`.
    fn has(&self, key: &K) -> impl Future<Output = Result<bool, Error>> + Send;

    /// Returns the value stored under `key`, or `None` if there is none.
    fn get(&self, key: &K) -> impl Future<Output = Result<Option<V>, Error>> + Send;
}

impl<K, V, T> CacheMutator<K, V> for &T
where
    T: CacheMutator<K, V>,
{
    fn put(&self, key: &K, value: V, ttl: Duration) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).put(key, value, ttl)
    }

    fn flush(&self) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).flush()
    }
}

impl<K, V, T> CacheMutator<K, V> for Arc<T>
where
    T: CacheMutator<K, V>,
{
    fn put(&self, key: &K, value: V, ttl: Duration) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).put(key, value, ttl)
    }

    fn flush(&self) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).flush()
    }
}

impl<K, V, T> CacheAccessor<K, V> for &T
where
    T: CacheAccessor<K, V>,
{
    fn has(&self, key: &K) -> impl Future<Output = Result<bool, Error>> + Send {
        (**self).has(key)
    }

    fn get(&self, key: &K) -> impl Future<Output = Result<Option<V>, Error>> + Send {
        (**self).get(key)
    }
}

impl<K, V, T> CacheAccessor<K, V> for Arc<T>
where
    T: CacheAccessor<K, V>,
{
    fn has(&self, key: &K) -> impl Future<Output = Result<bool, Error>> + Send {
        (**self).has(key)
    }

    fn get(&self, key: &K) -> impl Future<Output = Result<Option<V>, Error>> + Send {
        (**self).get(key)
    }
}
