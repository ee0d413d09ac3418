/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;

use super::{Bucket, BucketFunction, BucketListener, DoubleTag};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistogramType {
    /// Each bucket counts every observation not greater than its tag.
    Cumulative,
    /// Each bucket counts the observations of its own range only.
    Normal,
}

impl HistogramType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            HistogramType::Cumulative => "cumulative",
            HistogramType::Normal => "normal",
        }
    }
}

/// The value histogram interface used by meters, with tags in the unit the
/// values are observed in.
pub trait ValueHistogram: Send {
    fn observe(&mut self, value: f64);
    fn buckets(&self) -> Vec<Bucket<f64>>;
    fn total_observations(&self) -> u64;
    fn histogram_type(&self) -> HistogramType;
    fn is_percentiles(&self) -> bool;
}

/// Buckets created on demand by a bucket function.
///
/// Not synchronized, callers serialize the writes.
pub struct Histogram<T> {
    function: Box<dyn BucketFunction<T>>,
    histogram_type: HistogramType,
    percentiles: bool,
    buckets: BTreeMap<T, Bucket<T>>,
    listeners: Vec<BucketListener<T>>,
    total: u64,
}

impl<T: Ord + Clone> Histogram<T> {
    pub fn new<F>(function: F, histogram_type: HistogramType) -> Self
    where
        F: BucketFunction<T> + 'static,
    {
        Histogram {
            function: Box::new(function),
            histogram_type,
            percentiles: false,
            buckets: BTreeMap::new(),
            listeners: Vec::new(),
            total: 0,
        }
    }

    pub fn with_percentiles(mut self, percentiles: bool) -> Self {
        self.percentiles = percentiles;
        self
    }

    pub fn add_listener(&mut self, listener: BucketListener<T>) {
        self.listeners.push(listener);
    }

    #[inline]
    pub fn histogram_type(&self) -> HistogramType {
        self.histogram_type
    }

    #[inline]
    pub fn is_cumulative(&self) -> bool {
        self.histogram_type == HistogramType::Cumulative
    }

    #[inline]
    pub fn is_percentiles(&self) -> bool {
        self.percentiles
    }

    #[inline]
    pub fn total_observations(&self) -> u64 {
        self.total
    }

    /// Buckets ordered by tag.
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket<T>> {
        self.buckets.values()
    }

    pub fn observe(&mut self, value: f64) {
        let tag = self.function.bucket(value);
        self.total += 1;

        if self.is_cumulative() {
            for bucket in self.buckets.range_mut(&tag..).map(|(_, b)| b) {
                bucket.increment();
            }
            if !self.buckets.contains_key(&tag) {
                // every observation below is already counted by the next
                // lower bucket
                let lower = self
                    .buckets
                    .range(..&tag)
                    .next_back()
                    .map(|(_, b)| b.count())
                    .unwrap_or(0);
                self.create_bucket(tag, lower + 1);
            }
        } else if let Some(bucket) = self.buckets.get_mut(&tag) {
            bucket.increment();
        } else {
            self.create_bucket(tag, 1);
        }
    }

    fn create_bucket(&mut self, tag: T, count: u64) {
        let index = self.buckets.range(..&tag).count();
        let bucket = Bucket::new(tag.clone(), index, count, self.percentiles);
        for listener in &self.listeners {
            listener(&bucket);
        }
        self.buckets.insert(tag, bucket);
    }
}

impl ValueHistogram for Histogram<DoubleTag> {
    fn observe(&mut self, value: f64) {
        Histogram::observe(self, value);
    }

    fn buckets(&self) -> Vec<Bucket<f64>> {
        self.buckets.values().map(|b| b.map_tag(|t| t.value())).collect()
    }

    fn total_observations(&self) -> u64 {
        self.total
    }

    fn histogram_type(&self) -> HistogramType {
        self.histogram_type
    }

    fn is_percentiles(&self) -> bool {
        self.percentiles
    }
}
