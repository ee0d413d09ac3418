/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::Duration;

use dimstat_types::{MeterId, TimeUnit};

use crate::{HistogramSnapshot, Measurement};

pub trait Meter: Send + Sync {
    fn id(&self) -> &MeterId;
    fn measure(&self) -> Vec<Measurement>;
}

pub trait Counter: Meter {
    fn increment(&self, amount: f64);
    fn count(&self) -> f64;
}

pub trait Gauge: Meter {
    /// The current value, NaN if it is not available any more.
    fn value(&self) -> f64;
}

pub trait Timer: Meter {
    /// Negative amounts are ignored.
    fn record(&self, amount: f64, unit: TimeUnit);

    fn record_duration(&self, duration: Duration) {
        self.record(duration.as_nanos() as f64, TimeUnit::Nanoseconds);
    }

    fn count(&self) -> u64;
    fn total_time(&self, unit: TimeUnit) -> f64;
    fn max(&self, unit: TimeUnit) -> f64;

    fn mean(&self, unit: TimeUnit) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.total_time(unit) / count as f64
        }
    }

    fn base_time_unit(&self) -> TimeUnit;

    /// Statistics in the base time unit.
    fn take_snapshot(&self) -> HistogramSnapshot;
}

pub trait DistributionSummary: Meter {
    /// Negative amounts are ignored.
    fn record(&self, amount: f64);
    fn count(&self) -> u64;
    fn total_amount(&self) -> f64;
    fn max(&self) -> f64;

    fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.total_amount() / count as f64
        }
    }

    fn take_snapshot(&self) -> HistogramSnapshot;
}

pub trait LongTaskTimer: Meter {
    fn start(&self) -> Box<dyn LongTaskSample>;
    fn active_tasks(&self) -> usize;
    /// The sum of the durations of all running tasks.
    fn duration(&self, unit: TimeUnit) -> f64;
    /// The duration of the longest running task.
    fn max(&self, unit: TimeUnit) -> f64;
}

/// One running task of a [`LongTaskTimer`].
pub trait LongTaskSample: Send + Sync {
    /// Stop the task and get its duration, zero if already stopped.
    fn stop(&self) -> Duration;
    /// The duration so far, zero if already stopped.
    fn duration(&self, unit: TimeUnit) -> f64;
}

pub type ArcCounter = Arc<dyn Counter>;
pub type ArcGauge = Arc<dyn Gauge>;
pub type ArcTimer = Arc<dyn Timer>;
pub type ArcDistributionSummary = Arc<dyn DistributionSummary>;
pub type ArcLongTaskTimer = Arc<dyn LongTaskTimer>;

/// The value source of a gauge.
#[derive(Clone)]
pub struct GaugeFunction {
    inner: Arc<dyn Fn() -> Option<f64> + Send + Sync>,
}

impl GaugeFunction {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        GaugeFunction {
            inner: Arc::new(move || Some(f())),
        }
    }

    /// Observe `obj` without extending its lifetime.
    ///
    /// Once `obj` is dropped the gauge reports NaN.
    pub fn weak<T, F>(obj: &Arc<T>, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&T) -> f64 + Send + Sync + 'static,
    {
        let obj = Arc::downgrade(obj);
        GaugeFunction {
            inner: Arc::new(move || obj.upgrade().map(|o| f(&o))),
        }
    }

    pub fn value(&self) -> f64 {
        (self.inner)().unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn weak_gauge() {
        let obj = Arc::new(AtomicU64::new(3));
        let f = GaugeFunction::weak(&obj, |o| o.load(Ordering::Relaxed) as f64);
        assert_eq!(f.value(), 3.0);
        obj.store(5, Ordering::Relaxed);
        assert_eq!(f.value(), 5.0);
        assert_eq!(Arc::strong_count(&obj), 1);
        drop(obj);
        assert!(f.value().is_nan());
    }

    #[test]
    fn plain_gauge() {
        let f = GaugeFunction::new(|| 1.5);
        assert_eq!(f.clone().value(), 1.5);
    }
}
