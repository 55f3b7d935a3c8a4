// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Seeding a cache, asserting on it, and inspecting failures without panicking.

use std::time::Duration;

use cache_assert::{
    Binding, CacheTestHelper, FailureMode, KeyQuery,
    testing::{CacheOp, FakeCache},
};

fn main() -> Result<(), cache_assert::Error> {
    let store = FakeCache::<String, String>::new();
    let helper: CacheTestHelper<String, String, _, _> = CacheTestHelper::builder(store.clone(), store.clone())
        .name("profiles")
        .default_ttl(Duration::from_secs(15 * 60))
        .failure_mode(FailureMode::Collect)
        .build();

    helper
        .seed_cache([("user:1", "alice"), ("user:2", "bob")])?
        .assert_has(KeyQuery::batch([Binding::equals("user:1", "alice"), Binding::present("user:2")]))?
        .assert_missing("user:3")?;

    let found = helper.mismatches(KeyQuery::batch([Binding::equals("user:2", "carol"), Binding::present("user:9")]))?;
    for mismatch in &found {
        println!("{mismatch}");
    }

    helper.clear_cache()?;
    helper.assert_all_missing(["user:1", "user:2"])?;

    let puts = store
        .operations()
        .iter()
        .filter(|op| matches!(op, CacheOp::Put { .. }))
        .count();
    println!("{puts} entries seeded");

    Ok(())
}
