/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use dimstat_types::{MeterId, TimeUnit};

use super::CompositeChildren;
use crate::noop::NoopTimer;
use crate::{
    DistributionStatisticConfig, HistogramSnapshot, Measurement, Meter, MeterRegistry,
    RegistryId, Timer,
};

/// Each child keeps values in the base time unit of its own registry.
pub struct CompositeTimer {
    id: MeterId,
    config: DistributionStatisticConfig,
    children: CompositeChildren<dyn Timer>,
}

impl CompositeTimer {
    pub(crate) fn new(id: MeterId, config: DistributionStatisticConfig) -> Self {
        CompositeTimer {
            id,
            config,
            children: CompositeChildren::default(),
        }
    }

    pub(crate) fn attach(&self, registry: &dyn MeterRegistry) {
        self.children
            .attach(&self.id, registry, |r| r.timer(&self.id, &self.config));
    }

    pub(crate) fn detach(&self, registry: RegistryId) {
        self.children.detach(&self.id, registry);
    }

    pub fn first_child(&self) -> Arc<dyn Timer> {
        self.children
            .first_child(|| Arc::new(NoopTimer::new(self.id.clone())))
    }

    pub fn registries(&self) -> Vec<RegistryId> {
        self.children.registries()
    }

    #[inline]
    pub fn config(&self) -> &DistributionStatisticConfig {
        &self.config
    }

    /// Run `f` and record how long it took.
    pub fn record_fn<T, F>(&self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let r = f();
        self.record_duration(start.elapsed());
        r
    }
}

impl Meter for CompositeTimer {
    fn id(&self) -> &MeterId {
        &self.id
    }

    fn measure(&self) -> Vec<Measurement> {
        self.first_child().measure()
    }
}

impl Timer for CompositeTimer {
    fn record(&self, amount: f64, unit: TimeUnit) {
        self.children.for_each(|t| t.record(amount, unit));
    }

    fn record_duration(&self, duration: Duration) {
        self.children.for_each(|t| t.record_duration(duration));
    }

    fn count(&self) -> u64 {
        self.first_child().count()
    }

    fn total_time(&self, unit: TimeUnit) -> f64 {
        self.first_child().total_time(unit)
    }

    fn max(&self, unit: TimeUnit) -> f64 {
        self.first_child().max(unit)
    }

    fn base_time_unit(&self) -> TimeUnit {
        self.first_child().base_time_unit()
    }

    fn take_snapshot(&self) -> HistogramSnapshot {
        self.first_child().take_snapshot()
    }
}
