/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use portable_atomic::AtomicF64;

use dimstat_histogram::{HistogramType, ValueHistogram};
use dimstat_quantile::{Quantile, QuantileError, Quantiles};
use dimstat_types::TimeUnit;

use crate::{DistributionStatisticConfig, HistogramSnapshot};

struct Distribution {
    histogram: Option<Box<dyn ValueHistogram>>,
    quantiles: Option<Box<dyn Quantiles>>,
}

/// Count, total and max of recorded values, plus the histogram and the
/// quantile estimator asked for by the config.
pub(super) struct DistributionStats {
    count: AtomicU64,
    total: AtomicF64,
    max: AtomicF64,
    monitored: Vec<Quantile>,
    distribution: Option<Mutex<Distribution>>,
}

impl DistributionStats {
    pub(super) fn new(
        config: &DistributionStatisticConfig,
        base_time_unit: TimeUnit,
        default_type: HistogramType,
    ) -> Result<Self, QuantileError> {
        let quantiles = config.build_quantiles()?;
        let histogram = config.build_histogram(base_time_unit, default_type);
        let distribution = if quantiles.is_none() && histogram.is_none() {
            None
        } else {
            Some(Mutex::new(Distribution {
                histogram,
                quantiles,
            }))
        };
        Ok(DistributionStats {
            count: AtomicU64::new(0),
            total: AtomicF64::new(0.0),
            max: AtomicF64::new(0.0),
            monitored: config.quantiles().iter().cloned().collect(),
            distribution,
        })
    }

    pub(super) fn record(&self, value: f64) {
        if value.is_nan() || value < 0.0 {
            return;
        }
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(value, Ordering::Relaxed);
        self.max.fetch_max(value, Ordering::Relaxed);

        if let Some(distribution) = &self.distribution {
            let mut d = distribution.lock().unwrap();
            if let Some(h) = &mut d.histogram {
                h.observe(value);
            }
            if let Some(q) = &mut d.quantiles {
                q.observe(value);
            }
        }
    }

    #[inline]
    pub(super) fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    #[inline]
    pub(super) fn total(&self) -> f64 {
        self.total.load(Ordering::Relaxed)
    }

    #[inline]
    pub(super) fn max(&self) -> f64 {
        self.max.load(Ordering::Relaxed)
    }

    pub(super) fn snapshot(&self) -> HistogramSnapshot {
        let mut snap = HistogramSnapshot::new(self.count(), self.total(), self.max());
        let Some(distribution) = &self.distribution else {
            return snap;
        };
        let d = distribution.lock().unwrap();
        if let Some(q) = &d.quantiles {
            for quantile in &self.monitored {
                snap.add_quantile(quantile.clone(), q.get(quantile.value()));
            }
        }
        if let Some(h) = &d.histogram {
            for bucket in h.buckets() {
                snap.add_bucket(*bucket.tag(), bucket.count());
            }
        }
        snap
    }
}
