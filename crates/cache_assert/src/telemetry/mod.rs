// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured log events for helper operations.
//!
//! Events go through `tracing` when the `logs` feature is enabled and compile
//! to nothing otherwise.

use std::time::Duration;

#[cfg(test)]
pub(crate) mod testing;

#[derive(Debug, Clone, Copy)]
#[cfg_attr(not(any(feature = "logs", test)), expect(dead_code, reason = "only read by log events"))]
pub(crate) enum Operation {
    Seed,
    Flush,
    AssertHas,
    AssertMissing,
}

impl Operation {
    #[cfg_attr(not(any(feature = "logs", test)), expect(dead_code, reason = "only read by log events"))]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seed => "cache.seed",
            Self::Flush => "cache.flush",
            Self::AssertHas => "cache.assert_has",
            Self::AssertMissing => "cache.assert_missing",
        }
    }
}

pub(crate) fn seeded(cache_name: &'static str, entries: usize, ttl: Duration) {
    #[cfg(any(feature = "logs", test))]
    tracing::debug!(
        cache.name = cache_name,
        cache.operation = Operation::Seed.as_str(),
        cache.entries = entries,
        cache.ttl_secs = ttl.as_secs(),
        "cache.event"
    );

    #[cfg(not(any(feature = "logs", test)))]
    let _ = (cache_name, entries, ttl);
}

pub(crate) fn flushed(cache_name: &'static str) {
    #[cfg(any(feature = "logs", test))]
    tracing::debug!(
        cache.name = cache_name,
        cache.operation = Operation::Flush.as_str(),
        "cache.event"
    );

    #[cfg(not(any(feature = "logs", test)))]
    let _ = cache_name;
}

pub(crate) fn passed(cache_name: &'static str, operation: Operation, checked: usize) {
    #[cfg(any(feature = "logs", test))]
    tracing::debug!(
        cache.name = cache_name,
        cache.operation = operation.as_str(),
        cache.checked = checked,
        "cache.event"
    );

    #[cfg(not(any(feature = "logs", test)))]
    let _ = (cache_name, operation, checked);
}

pub(crate) fn failed(cache_name: &'static str, operation: Operation, checked: usize, failed: usize, report: &str) {
    #[cfg(any(feature = "logs", test))]
    tracing::error!(
        cache.name = cache_name,
        cache.operation = operation.as_str(),
        cache.checked = checked,
        cache.failed = failed,
        cache.report = report,
        "cache.assertion_failed"
    );

    #[cfg(not(any(feature = "logs", test)))]
    let _ = (cache_name, operation, checked, failed, report);
}
