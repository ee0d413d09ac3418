/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use dimstat_types::TimeUnit;

use super::{
    Bucket, BucketFunction, BucketListener, DoubleTag, Histogram, HistogramType, ValueHistogram,
};

/// A histogram of durations whose bucket function works in its own time
/// unit.
///
/// Values are observed in `caller_unit`, converted to `function_unit` for
/// bucketing, and bucket tags are reported back in `caller_unit`.
pub struct TimeHistogram {
    inner: Histogram<DoubleTag>,
    function_unit: TimeUnit,
    caller_unit: TimeUnit,
}

impl TimeHistogram {
    pub fn new<F>(
        function: F,
        function_unit: TimeUnit,
        caller_unit: TimeUnit,
        histogram_type: HistogramType,
    ) -> Self
    where
        F: BucketFunction<DoubleTag> + 'static,
    {
        TimeHistogram {
            inner: Histogram::new(function, histogram_type),
            function_unit,
            caller_unit,
        }
    }

    pub fn with_percentiles(mut self, percentiles: bool) -> Self {
        self.inner = self.inner.with_percentiles(percentiles);
        self
    }

    #[inline]
    pub fn function_unit(&self) -> TimeUnit {
        self.function_unit
    }

    #[inline]
    pub fn caller_unit(&self) -> TimeUnit {
        self.caller_unit
    }

    /// The listener receives buckets with tags in the caller unit.
    pub fn add_listener(&mut self, listener: BucketListener<f64>) {
        let (function_unit, caller_unit) = (self.function_unit, self.caller_unit);
        self.inner.add_listener(Box::new(move |b: &Bucket<DoubleTag>| {
            listener(&b.map_tag(|t| caller_unit.convert(t.value(), function_unit)))
        }));
    }

    fn to_caller(&self, tag: &DoubleTag) -> f64 {
        self.caller_unit.convert(tag.value(), self.function_unit)
    }
}

impl ValueHistogram for TimeHistogram {
    fn observe(&mut self, value: f64) {
        let value = self.function_unit.convert(value, self.caller_unit);
        self.inner.observe(value);
    }

    fn buckets(&self) -> Vec<Bucket<f64>> {
        self.inner
            .buckets()
            .map(|b| b.map_tag(|t| self.to_caller(t)))
            .collect()
    }

    fn total_observations(&self) -> u64 {
        self.inner.total_observations()
    }

    fn histogram_type(&self) -> HistogramType {
        self.inner.histogram_type()
    }

    fn is_percentiles(&self) -> bool {
        self.inner.is_percentiles()
    }
}
