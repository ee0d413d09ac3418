/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

//! Meters that drop every write and read as zero.

use std::time::Duration;

use dimstat_types::{MeterId, TimeUnit};

use crate::{
    Counter, DistributionSummary, Gauge, HistogramSnapshot, LongTaskSample, LongTaskTimer,
    Measurement, Meter, Timer,
};

macro_rules! impl_noop_meter {
    ($name:ident) => {
        pub struct $name {
            id: MeterId,
        }

        impl $name {
            pub fn new(id: MeterId) -> Self {
                $name { id }
            }
        }

        impl Meter for $name {
            fn id(&self) -> &MeterId {
                &self.id
            }

            fn measure(&self) -> Vec<Measurement> {
                Vec::new()
            }
        }
    };
}

impl_noop_meter!(NoopCounter);
impl_noop_meter!(NoopGauge);
impl_noop_meter!(NoopTimer);
impl_noop_meter!(NoopDistributionSummary);
impl_noop_meter!(NoopLongTaskTimer);

impl Counter for NoopCounter {
    fn increment(&self, _amount: f64) {}

    fn count(&self) -> f64 {
        0.0
    }
}

impl Gauge for NoopGauge {
    fn value(&self) -> f64 {
        0.0
    }
}

impl Timer for NoopTimer {
    fn record(&self, _amount: f64, _unit: TimeUnit) {}

    fn count(&self) -> u64 {
        0
    }

    fn total_time(&self, _unit: TimeUnit) -> f64 {
        0.0
    }

    fn max(&self, _unit: TimeUnit) -> f64 {
        0.0
    }

    fn base_time_unit(&self) -> TimeUnit {
        TimeUnit::Seconds
    }

    fn take_snapshot(&self) -> HistogramSnapshot {
        HistogramSnapshot::empty()
    }
}

impl DistributionSummary for NoopDistributionSummary {
    fn record(&self, _amount: f64) {}

    fn count(&self) -> u64 {
        0
    }

    fn total_amount(&self) -> f64 {
        0.0
    }

    fn max(&self) -> f64 {
        0.0
    }

    fn take_snapshot(&self) -> HistogramSnapshot {
        HistogramSnapshot::empty()
    }
}

impl LongTaskTimer for NoopLongTaskTimer {
    fn start(&self) -> Box<dyn LongTaskSample> {
        Box::new(NoopSample)
    }

    fn active_tasks(&self) -> usize {
        0
    }

    fn duration(&self, _unit: TimeUnit) -> f64 {
        0.0
    }

    fn max(&self, _unit: TimeUnit) -> f64 {
        0.0
    }
}

pub struct NoopSample;

impl LongTaskSample for NoopSample {
    fn stop(&self) -> Duration {
        Duration::ZERO
    }

    fn duration(&self, _unit: TimeUnit) -> f64 {
        0.0
    }
}
