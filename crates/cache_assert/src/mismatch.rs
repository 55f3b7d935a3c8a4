// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Diagnostics for cache state that did not match an assertion.

use std::fmt::{self, Debug, Display};

use pretty_assertions::Comparison;

/// A single failed cache check.
///
/// The [`Display`] output is the failure message a test sees: it always names
/// the key, and value mismatches also show the expected and actual values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch<K, V> {
    /// A key that should exist was not found.
    Missing {
        /// The key that was checked.
        key: K,
    },
    /// A key held a different value than expected, or no value at all.
    Unequal {
        /// The key that was checked.
        key: K,
        /// The value the assertion asked for.
        expected: V,
        /// The value the cache returned.
        actual: Option<V>,
    },
    /// A key that should be absent was found.
    Unexpected {
        /// The key that was checked.
        key: K,
    },
}

impl<K, V> Mismatch<K, V> {
    /// Returns the key that failed its check.
    #[must_use]
    pub fn key(&self) -> &K {
        match self {
            Self::Missing { key } | Self::Unequal { key, .. } | Self::Unexpected { key } => key,
        }
    }
}

impl<K, V> Display for Mismatch<K, V>
where
    K: Display,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { key } => write!(f, "Cache missing key: {key}"),
            Self::Unexpected { key } => write!(f, "Cache has unexpected key: {key}"),
            Self::Unequal { key, expected, actual } => {
                writeln!(f, "Cache value mismatch for key: {key}")?;
                writeln!(f, "  expected: {expected:?}")?;
                match actual {
                    Some(actual) => {
                        writeln!(f, "    actual: {actual:?}")?;
                        write!(f, "\n{}", Comparison::new(expected, actual))
                    }
                    None => write!(f, "    actual: <absent>"),
                }
            }
        }
    }
}

/// Renders one or more mismatches as a single failure message.
pub(crate) fn render_report<K, V>(mismatches: &[Mismatch<K, V>]) -> String
where
    K: Display,
    V: Debug,
{
    match mismatches {
        [single] => single.to_string(),
        many => {
            let mut report = format!("{} cache assertions failed:", many.len());
            for mismatch in many {
                let text = mismatch.to_string();
                let mut lines = text.lines();
                if let Some(first) = lines.next() {
                    report.push_str("\n- ");
                    report.push_str(first);
                }
                for line in lines {
                    report.push_str("\n  ");
                    report.push_str(line);
                }
            }
            report
        }
    }
}
