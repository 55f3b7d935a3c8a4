// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Arrange and assert helpers for tests that exercise cache-backed code.
//!
//! [`CacheTestHelper`] seeds a cache before the code under test runs, clears
//! it, and asserts afterwards which keys exist and what they hold. It does no
//! caching of its own: writes go through an injected [`CacheMutator`] and
//! reads through an injected [`CacheAccessor`].
//!
//! # Overview
//!
//! - [`seed_cache`](CacheTestHelper::seed_cache) / [`seed_cache_for`](CacheTestHelper::seed_cache_for)
//!   put entries with the default or an explicit TTL.
//! - [`clear_cache`](CacheTestHelper::clear_cache) flushes everything.
//! - [`assert_has`](CacheTestHelper::assert_has) takes a [`KeyQuery`]: one key
//!   with or without an expected value, a batch of [`Binding`]s, or a list of keys.
//! - [`assert_missing`](CacheTestHelper::assert_missing) and
//!   [`assert_all_missing`](CacheTestHelper::assert_all_missing) check absence.
//!
//! Assertion failures panic with a message naming the key (and the expected
//! and actual values for value checks). Errors from the capabilities are
//! returned unchanged as [`Error`].
//!
//! # Example
//!
//! ```
//! use std::{collections::HashMap, sync::Mutex, time::Duration};
//!
//! use cache_assert::{CacheAccessor, CacheMutator, CacheTestHelper, Error, KeyQuery};
//!
//! #[derive(Default)]
//! struct MapCache(Mutex<HashMap<String, String>>);
//!
//! impl CacheMutator<String, String> for MapCache {
//!     async fn put(&self, key: &String, value: String, _ttl: Duration) -> Result<(), Error> {
//!         self.0.lock().unwrap().insert(key.clone(), value);
//!         Ok(())
//!     }
//!
//!     async fn flush(&self) -> Result<(), Error> {
//!         self.0.lock().unwrap().clear();
//!         Ok(())
//!     }
//! }
//!
//! impl CacheAccessor<String, String> for MapCache {
//!     async fn has(&self, key: &String) -> Result<bool, Error> {
//!         Ok(self.0.lock().unwrap().contains_key(key))
//!     }
//!
//!     async fn get(&self, key: &String) -> Result<Option<String>, Error> {
//!         Ok(self.0.lock().unwrap().get(key).cloned())
//!     }
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let cache = MapCache::default();
//! let helper: CacheTestHelper<String, String, _, _> = CacheTestHelper::new(&cache, &cache);
//!
//! helper.seed_cache([("user:1", "alice")])?;
//! helper
//!     .assert_has(KeyQuery::equals("user:1", "alice"))?
//!     .assert_missing("user:2")?;
//!
//! helper.clear_cache()?;
//! helper.assert_missing("user:1")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `logs`: emit `tracing` events for every seed, flush, and assertion.
//! - `test-util`: the `testing::FakeCache` recording double.

mod builder;
mod capability;
pub mod error;
mod helper;
mod mismatch;
mod query;
mod telemetry;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use builder::{DEFAULT_TTL, FailureMode, HelperBuilder};
#[doc(inline)]
pub use capability::{CacheAccessor, CacheMutator};
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use helper::CacheTestHelper;
#[doc(inline)]
pub use mismatch::Mismatch;
#[doc(inline)]
pub use query::{Binding, Expected, KeyQuery};
