/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::cmp::Ordering;
use std::fmt;

/// A float bucket tag with a total order.
#[derive(Clone, Copy, Debug)]
pub struct DoubleTag(f64);

impl DoubleTag {
    pub const INFINITY: DoubleTag = DoubleTag(f64::INFINITY);

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.0.is_infinite()
    }
}

impl From<f64> for DoubleTag {
    fn from(v: f64) -> Self {
        // -0.0 and 0.0 are the same bucket
        if v == 0.0 {
            DoubleTag(0.0)
        } else {
            DoubleTag(v)
        }
    }
}

impl PartialEq for DoubleTag {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for DoubleTag {}

impl PartialOrd for DoubleTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DoubleTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for DoubleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == f64::INFINITY {
            f.write_str("+Inf")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Called with every bucket newly created in a histogram.
pub type BucketListener<T> = Box<dyn Fn(&Bucket<T>) + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket<T> {
    tag: T,
    index: usize,
    count: u64,
    percentiles: bool,
}

impl<T> Bucket<T> {
    pub(crate) fn new(tag: T, index: usize, count: u64, percentiles: bool) -> Self {
        Bucket {
            tag,
            index,
            count,
            percentiles,
        }
    }

    /// The upper edge of the bucket.
    #[inline]
    pub fn tag(&self) -> &T {
        &self.tag
    }

    /// The rank of the bucket among all buckets when it was created.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether the bucket belongs to a percentile ladder histogram, which
    /// backends usually export with a different tag key.
    #[inline]
    pub fn is_percentiles(&self) -> bool {
        self.percentiles
    }

    #[inline]
    pub(crate) fn increment(&mut self) {
        self.count += 1;
    }

    pub fn map_tag<U, F>(&self, f: F) -> Bucket<U>
    where
        F: FnOnce(&T) -> U,
    {
        Bucket {
            tag: f(&self.tag),
            index: self.index,
            count: self.count,
            percentiles: self.percentiles,
        }
    }
}
