// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(feature = "test-util")]

//! End-to-end seeding, clearing, and assertions against the recording fake.

use std::{
    collections::HashMap,
    panic::{AssertUnwindSafe, catch_unwind},
    time::Duration,
};

use cache_assert::{
    Binding, CacheTestHelper, Error, KeyQuery,
    testing::{CacheOp, FakeCache},
};
use rstest::rstest;

type TestResult = Result<(), Error>;
type Store = FakeCache<String, String>;
type Helper = CacheTestHelper<String, String, Store, Store>;

fn helper() -> (Helper, Store) {
    let store = Store::new();
    (CacheTestHelper::from_store(store.clone()), store)
}

fn fails(f: impl FnOnce()) -> String {
    let payload = catch_unwind(AssertUnwindSafe(f)).expect_err("expected an assertion failure");
    payload.downcast_ref::<String>().cloned().unwrap_or_default()
}

#[test]
fn user_session_scenario() -> TestResult {
    let (helper, _) = helper();

    helper.seed_cache_for([("user:1", "alice")], Duration::from_secs(60 * 60))?;

    helper.assert_has(KeyQuery::equals("user:1", "alice"))?;
    let message = fails(|| {
        let _ = helper.assert_has(KeyQuery::present("user:2"));
    });
    assert!(message.contains("user:2"), "got: {message}");
    helper.assert_missing("user:2")?;

    helper.clear_cache()?;

    helper.assert_missing("user:1")?;
    let message = fails(|| {
        let _ = helper.assert_has(KeyQuery::present("user:1"));
    });
    assert_eq!(message, "Cache missing key: user:1");
    Ok(())
}

#[rstest]
#[case::minute(Duration::from_secs(60))]
#[case::hour(Duration::from_secs(60 * 60))]
#[case::day(Duration::from_secs(24 * 60 * 60))]
fn every_seeded_entry_is_found(#[case] ttl: Duration) -> TestResult {
    let (helper, store) = helper();
    let entries: HashMap<String, String> = (0..5).map(|i| (format!("key:{i}"), format!("value:{i}"))).collect();

    helper.seed_cache_for(entries.clone(), ttl)?;

    for (key, value) in &entries {
        helper.assert_has(KeyQuery::equals(key.clone(), value.clone()))?;
        assert_eq!(store.ttl_of(key), Some(ttl));
    }
    Ok(())
}

#[test]
fn cleared_keys_stay_missing() -> TestResult {
    let (helper, _) = helper();
    helper.seed_cache([("a", "1"), ("b", "2")])?;

    helper.clear_cache()?;
    helper.assert_all_missing(["a", "b"])?;

    helper.clear_cache()?;
    helper.assert_all_missing(["a", "b"])?;
    Ok(())
}

#[rstest]
#[case::both_match("1", "2", true)]
#[case::first_differs("9", "2", false)]
#[case::second_differs("1", "9", false)]
fn batch_passes_only_when_every_pair_passes(#[case] a: &str, #[case] b: &str, #[case] passes: bool) -> TestResult {
    let (helper, _) = helper();
    helper.seed_cache([("a", "1"), ("b", "2")])?;

    let query = KeyQuery::batch([Binding::equals("a", a), Binding::equals("b", b)]);
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _ = helper.assert_has(query);
    }));

    assert_eq!(outcome.is_ok(), passes);
    Ok(())
}

#[rstest]
#[case::both_present(&["a", "b"], true)]
#[case::one_absent(&["a", "z"], false)]
fn key_sequence_checks_presence_only(#[case] keys: &[&str], #[case] passes: bool) -> TestResult {
    let (helper, _) = helper();
    helper.seed_cache([("a", "whatever"), ("b", "")])?;

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _ = helper.assert_has(KeyQuery::keys(keys.iter().copied()));
    }));

    assert_eq!(outcome.is_ok(), passes);
    Ok(())
}

#[rstest]
#[case::both_absent(&["x", "y"], true)]
#[case::one_present(&["x", "a"], false)]
fn all_missing_matches_individual_checks(#[case] keys: &[&str], #[case] passes: bool) -> TestResult {
    let (helper, _) = helper();
    helper.seed_cache([("a", "1")])?;

    let individually = keys.iter().all(|key| helper.missing_mismatches([*key]).is_ok_and(|found| found.is_empty()));
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _ = helper.assert_all_missing(keys.iter().copied());
    }));

    assert_eq!(outcome.is_ok(), passes);
    assert_eq!(individually, passes);
    Ok(())
}

#[test]
fn flush_failure_surfaces_unchanged() {
    let (helper, store) = helper();
    store.fail_when(|op| matches!(op, CacheOp::Flush));

    let error = helper.clear_cache().expect_err("flush failure should surface");

    assert!(error.to_string().contains("fake: flush failed"), "got: {error}");
}

#[test]
fn has_failure_surfaces_before_any_assertion() {
    let (helper, store) = helper();
    store.fail_when(|op| matches!(op, CacheOp::Has(_)));

    let _ = helper.assert_missing("a").expect_err("has failure should surface");
    let _ = helper
        .assert_has(KeyQuery::present("a"))
        .expect_err("has failure should surface");
}
