/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use dimstat_quantile::Quantile;

#[derive(Clone, Debug, PartialEq)]
pub struct ValueAtQuantile {
    pub quantile: Quantile,
    pub value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CountAtBucket {
    pub bucket: f64,
    pub count: u64,
}

/// A point in time view of the distribution of a timer or a summary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistogramSnapshot {
    count: u64,
    total: f64,
    max: f64,
    quantiles: Vec<ValueAtQuantile>,
    buckets: Vec<CountAtBucket>,
}

impl HistogramSnapshot {
    pub fn new(count: u64, total: f64, max: f64) -> Self {
        HistogramSnapshot {
            count,
            total,
            max,
            quantiles: Vec::new(),
            buckets: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        HistogramSnapshot::default()
    }

    pub(crate) fn add_quantile(&mut self, quantile: Quantile, value: f64) {
        self.quantiles.push(ValueAtQuantile { quantile, value });
    }

    pub(crate) fn add_bucket(&mut self, bucket: f64, count: u64) {
        self.buckets.push(CountAtBucket { bucket, count });
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }

    #[inline]
    pub fn quantiles(&self) -> &[ValueAtQuantile] {
        &self.quantiles
    }

    #[inline]
    pub fn buckets(&self) -> &[CountAtBucket] {
        &self.buckets
    }

    pub fn quantile(&self, quantile: f64) -> Option<f64> {
        self.quantiles
            .iter()
            .find(|v| v.quantile.value() == quantile)
            .map(|v| v.value)
    }

    pub fn foreach_stat<F>(&self, mut call: F)
    where
        F: FnMut(Option<f64>, &str, f64),
    {
        call(None, "count", self.count as f64);
        call(None, "total", self.total);
        call(None, "max", self.max);
        call(None, "mean", self.mean());
        for v in &self.quantiles {
            call(Some(v.quantile.value()), v.quantile.as_str(), v.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats() {
        let mut snap = HistogramSnapshot::new(4, 10.0, 7.0);
        snap.add_quantile(Quantile::PCT50, 1.0);
        snap.add_quantile(Quantile::PCT99, 7.0);
        snap.add_bucket(5.0, 3);
        assert_eq!(snap.mean(), 2.5);
        assert_eq!(snap.quantile(0.99), Some(7.0));
        assert_eq!(snap.quantile(0.9), None);
        assert_eq!(snap.buckets()[0].count, 3);

        let mut names = Vec::new();
        snap.foreach_stat(|q, name, v| names.push((q, name.to_string(), v)));
        assert_eq!(names.len(), 6);
        assert_eq!(names[3], (None, "mean".to_string(), 2.5));
        assert_eq!(names[5], (Some(0.99), "0.99".to_string(), 7.0));
    }

    #[test]
    fn empty() {
        let snap = HistogramSnapshot::empty();
        assert_eq!(snap.count(), 0);
        assert_eq!(snap.mean(), 0.0);
        assert!(snap.quantiles().is_empty());
    }
}
