/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::LazyLock;

static PERCENTILE_BUCKETS: LazyLock<Vec<i64>> = LazyLock::new(|| {
    let mut buckets = vec![1, 2, 3];
    let mut exp = 2;
    while exp < 62 {
        let mut current: i64 = 1 << exp;
        let delta = current / 3;
        let next = (current << 2) - delta;
        while current < next {
            buckets.push(current);
            current += delta;
        }
        exp += 2;
    }
    buckets.push(i64::MAX);
    buckets
});

/// The upper edges of the percentile buckets.
///
/// Every even power of two `2^e` is split into steps of `2^e / 3` up to
/// `4 * 2^e`, which keeps the relative error of each bucket roughly equal.
pub fn percentile_buckets() -> &'static [i64] {
    &PERCENTILE_BUCKETS
}

/// The smallest percentile bucket edge not less than `value`.
pub fn percentile_bucket(value: f64) -> f64 {
    let buckets = percentile_buckets();
    let idx = buckets.partition_point(|b| (*b as f64) < value);
    match buckets.get(idx) {
        Some(b) => *b as f64,
        None => f64::INFINITY,
    }
}
