/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::Duration;

use dimstat_types::{MeterId, TimeUnit};

use super::CompositeChildren;
use crate::noop::NoopLongTaskTimer;
use crate::{LongTaskSample, LongTaskTimer, Measurement, Meter, MeterRegistry, RegistryId};

pub struct CompositeLongTaskTimer {
    id: MeterId,
    children: CompositeChildren<dyn LongTaskTimer>,
}

impl CompositeLongTaskTimer {
    pub(crate) fn new(id: MeterId) -> Self {
        CompositeLongTaskTimer {
            id,
            children: CompositeChildren::default(),
        }
    }

    pub(crate) fn attach(&self, registry: &dyn MeterRegistry) {
        self.children
            .attach(&self.id, registry, |r| r.long_task_timer(&self.id));
    }

    pub(crate) fn detach(&self, registry: RegistryId) {
        self.children.detach(&self.id, registry);
    }

    pub fn first_child(&self) -> Arc<dyn LongTaskTimer> {
        self.children
            .first_child(|| Arc::new(NoopLongTaskTimer::new(self.id.clone())))
    }

    pub fn registries(&self) -> Vec<RegistryId> {
        self.children.registries()
    }
}

impl Meter for CompositeLongTaskTimer {
    fn id(&self) -> &MeterId {
        &self.id
    }

    fn measure(&self) -> Vec<Measurement> {
        self.first_child().measure()
    }
}

impl LongTaskTimer for CompositeLongTaskTimer {
    fn start(&self) -> Box<dyn LongTaskSample> {
        let mut samples = Vec::with_capacity(self.children.len());
        self.children.for_each(|t| samples.push(t.start()));
        Box::new(CompositeSample { samples })
    }

    fn active_tasks(&self) -> usize {
        self.first_child().active_tasks()
    }

    fn duration(&self, unit: TimeUnit) -> f64 {
        self.first_child().duration(unit)
    }

    fn max(&self, unit: TimeUnit) -> f64 {
        self.first_child().max(unit)
    }
}

/// The samples started in every child at the same time.
struct CompositeSample {
    samples: Vec<Box<dyn LongTaskSample>>,
}

impl LongTaskSample for CompositeSample {
    fn stop(&self) -> Duration {
        let mut first = None;
        for sample in &self.samples {
            let d = sample.stop();
            first.get_or_insert(d);
        }
        first.unwrap_or(Duration::ZERO)
    }

    fn duration(&self, unit: TimeUnit) -> f64 {
        self.samples
            .first()
            .map(|s| s.duration(unit))
            .unwrap_or(0.0)
    }
}
